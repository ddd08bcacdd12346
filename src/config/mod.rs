//! Process configuration.
//!
//! Every setting is read from an environment variable and falls back to a
//! default; the same setting can also be passed as a command line flag.

use std::net::IpAddr;
use std::time::Duration;

use clap::{ArgAction, Args, Parser};


/// Backend server configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "blog-api")]
#[command(author, version, about = "Blog backend API server", long_about = None)]
pub struct Config {
    /// Deployment environment (dev enables API docs and debug logging)
    #[arg(long = "env", env = "BACKEND_ENV", default_value = "dev")]
    pub backend_env: String,

    /// Host address to bind to
    #[arg(long, env = "BACKEND_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "BACKEND_PORT", default_value_t = 80)]
    pub port: u16,

    /// Seconds in-flight requests get to finish after shutdown starts
    #[arg(long, env = "BACKEND_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,

    /// Include created_at in the article list response
    #[arg(
        long,
        env = "BACKEND_LIST_CREATED_AT",
        default_value_t = false,
        action = ArgAction::Set
    )]
    pub list_created_at: bool,

    #[command(flatten)]
    pub database: DatabaseConfig,
}

/// Connection settings for the blog database.
///
/// Argument ids carry a `db_` prefix so they never collide with the
/// server's own `host`/`port` once flattened into [`Config`].
#[derive(Args, Debug, Clone)]
pub struct DatabaseConfig {
    #[arg(
        id = "db_host",
        long = "db-host",
        env = "BLOG_DATABASE_HOST",
        default_value = "127.0.0.1"
    )]
    pub host: String,

    #[arg(
        id = "db_port",
        long = "db-port",
        env = "BLOG_DATABASE_PORT",
        default_value_t = 3306
    )]
    pub port: u16,

    #[arg(
        id = "db_user",
        long = "db-user",
        env = "BLOG_DATABASE_USER",
        default_value = "blog"
    )]
    pub user: String,

    #[arg(
        id = "db_password",
        long = "db-password",
        env = "BLOG_DATABASE_PASSWORD",
        default_value = "blog",
        hide_env_values = true
    )]
    pub password: String,

    #[arg(
        id = "db_name",
        long = "db-name",
        env = "BLOG_DATABASE_DATABASE",
        default_value = "blog"
    )]
    pub name: String,

    /// Full connection URL; overrides the individual settings above
    #[arg(
        id = "db_url",
        long = "db-url",
        env = "BLOG_DATABASE_URL",
        hide_env_values = true
    )]
    pub url: Option<String>,

    /// Connection attempts before giving up at startup
    #[arg(
        id = "db_max_retries",
        long = "db-max-retries",
        env = "BLOG_DATABASE_MAX_RETRIES",
        default_value_t = 5
    )]
    pub max_retries: u32,
}

impl Config {
    /// Load configuration from the environment only, ignoring process arguments.
    pub fn from_env() -> Result<Self, clap::Error> {
        Self::try_parse_from(["blog-api"])
    }

    pub fn is_dev(&self) -> bool {
        self.backend_env == "dev"
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl DatabaseConfig {
    /// Connection URL understood by the sqlx `Any` driver.
    pub fn url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "mysql://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }
}
