//! HTTP API: handlers, routes and the process entry point.

mod error;
mod handlers;
mod routes;
mod state;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod routes_test;

use std::net::SocketAddr;

use sqlx::AnyPool;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::ApiError;
pub use handlers::{
    AddArticleRequest, ArticleResponse, ErrorResponse, HealthResponse, IdResponse,
    RegisterUserRequest, respond_error, respond_json,
};
pub use routes::{ApiDoc, create_router};
pub use state::AppState;

use crate::clock::RealClocker;
use crate::config::Config;
use crate::server::Server;
use crate::store::{Backend, RetryPolicy, UrlConnector, migrate, open_with_retry};

/// Initialize tracing subscriber with env filter
pub fn init_tracing(config: &Config) {
    let default_filter = if config.is_dev() {
        "blog_backend=debug,tower_http=debug"
    } else {
        "blog_backend=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the API server until `shutdown` is cancelled or the process is signalled.
///
/// The database connection is released after the server has stopped, whether
/// or not serving succeeded. Releasing is bounded by the shutdown timeout so
/// handlers left running after a failed drain cannot hold the process open.
pub async fn run(config: Config, shutdown: CancellationToken) -> Result<(), ApiError> {
    let url = config.database.url();
    let backend = Backend::from_url(&url)?;
    let connector = UrlConnector::new(url);
    let policy = RetryPolicy::new(config.database.max_retries);

    let (pool, release) = open_with_retry(&connector, policy).await?;
    let result = serve(&config, backend, pool, shutdown).await;
    release.release_within(config.shutdown_timeout()).await;
    result
}

async fn serve(
    config: &Config,
    backend: Backend,
    pool: AnyPool,
    shutdown: CancellationToken,
) -> Result<(), ApiError> {
    migrate(&pool, backend).await?;

    let state =
        AppState::from_pool(pool, RealClocker).with_list_created_at(config.list_created_at);
    let app = create_router(state, config.is_dev());

    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ApiError::Bind { addr, source })?;
    info!("API server listening on http://{}", addr);

    Server::new(listener, app)
        .with_drain_timeout(config.shutdown_timeout())
        .run(shutdown)
        .await?;
    Ok(())
}
