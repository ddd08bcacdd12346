//! Database connection provider.
//!
//! The database usually starts alongside the backend, so opening it is
//! retried with a fixed backoff before startup gives up.

use std::time::Duration;

use futures_util::future::BoxFuture;
use sqlx::{AnyPool, Connection};
use sqlx::any::AnyPoolOptions;
use sqlx::migrate::Migrator;
use tracing::{info, warn};

use super::{StoreError, StoreResult};

static MYSQL_MIGRATOR: Migrator = sqlx::migrate!("./migrations/mysql");
static SQLITE_MIGRATOR: Migrator = sqlx::migrate!("./migrations/sqlite");

/// Time to wait between connection attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(2);

/// Per-attempt deadline for opening and pinging the database.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Database engines the store can run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    MySql,
    Sqlite,
}

impl Backend {
    /// Pick the backend from a connection URL scheme.
    pub fn from_url(url: &str) -> StoreResult<Self> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme {
            "mysql" | "mariadb" => Ok(Backend::MySql),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(StoreError::Connection {
                message: format!("unsupported database scheme '{}'", other),
            }),
        }
    }

    fn migrator(&self) -> &'static Migrator {
        match self {
            Backend::MySql => &MYSQL_MIGRATOR,
            Backend::Sqlite => &SQLITE_MIGRATOR,
        }
    }
}

/// Opens a verified database handle.
pub trait Connector: Send + Sync {
    /// Open a pool and make sure the database answers.
    fn connect(&self) -> BoxFuture<'_, StoreResult<AnyPool>>;
}

/// Connects with a sqlx connection URL.
#[derive(Debug, Clone)]
pub struct UrlConnector {
    url: String,
    max_connections: u32,
}

impl UrlConnector {
    /// An in-memory SQLite URL gets a single connection, otherwise every
    /// connection would see its own empty database.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let max_connections = if url.contains(":memory:") { 1 } else { 10 };
        Self {
            url,
            max_connections,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

impl Connector for UrlConnector {
    fn connect(&self) -> BoxFuture<'_, StoreResult<AnyPool>> {
        Box::pin(async move {
            sqlx::any::install_default_drivers();

            let mut options = AnyPoolOptions::new()
                .max_connections(self.max_connections)
                .acquire_timeout(CONNECT_TIMEOUT);
            if self.url.contains(":memory:") {
                options = options.idle_timeout(None).max_lifetime(None);
            }

            let pool = options
                .connect(&self.url)
                .await
                .map_err(|e| StoreError::Connection {
                    message: e.to_string(),
                })?;

            let ping = async {
                let mut conn = pool.acquire().await?;
                conn.ping().await
            };
            match tokio::time::timeout(CONNECT_TIMEOUT, ping).await {
                Ok(Ok(())) => Ok(pool),
                Ok(Err(e)) => {
                    pool.close().await;
                    Err(StoreError::Connection {
                        message: e.to_string(),
                    })
                }
                Err(_) => {
                    pool.close().await;
                    Err(StoreError::Connection {
                        message: format!("ping timed out after {:?}", CONNECT_TIMEOUT),
                    })
                }
            }
        })
    }
}

/// How often and how patiently to retry the initial connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: DEFAULT_BACKOFF,
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5)
    }
}

/// Closes the pool handed out by [`open_with_retry`].
///
/// Call [`Release::release`] once the server has stopped serving.
#[must_use = "the pool stays open until released"]
#[derive(Debug)]
pub struct Release {
    pool: AnyPool,
}

impl Release {
    pub async fn release(self) {
        info!("Closing database connections");
        self.pool.close().await;
    }

    /// Like [`Release::release`], but gives up after `timeout`.
    ///
    /// Closing waits for every checked-out connection, including ones held by
    /// handlers that outlived the drain. Returns `false` when connections
    /// were still busy at the deadline.
    pub async fn release_within(self, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, self.release()).await {
            Ok(()) => true,
            Err(_) => {
                warn!(?timeout, "Database connections still in use, not waiting any longer");
                false
            }
        }
    }
}

/// Connect, retrying with a fixed backoff until `policy.max_attempts` is used up.
///
/// Returns the live pool and its release handle, or the last connection
/// error once every attempt has failed.
pub async fn open_with_retry<C>(connector: &C, policy: RetryPolicy) -> StoreResult<(AnyPool, Release)>
where
    C: Connector + ?Sized,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        info!(attempt, max_attempts, "Connecting to database");
        match connector.connect().await {
            Ok(pool) => {
                info!(attempt, "Database connection established");
                let release = Release { pool: pool.clone() };
                return Ok((pool, release));
            }
            Err(e) if attempt < max_attempts => {
                warn!(attempt, max_attempts, error = %e, "Database not ready, retrying in {:?}", policy.backoff);
                tokio::time::sleep(policy.backoff).await;
                attempt += 1;
            }
            Err(e) => {
                warn!(attempt, max_attempts, error = %e, "Giving up on database connection");
                return Err(StoreError::Connection {
                    message: format!("failed after {} attempts: {}", attempt, e),
                });
            }
        }
    }
}

/// Apply pending schema migrations for `backend`.
pub async fn migrate(pool: &AnyPool, backend: Backend) -> StoreResult<()> {
    backend.migrator().run(pool).await?;
    info!(?backend, "Database migrations complete");
    Ok(())
}
