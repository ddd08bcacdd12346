//! Server lifecycle coordinator.
//!
//! A [`Server`] owns an already bound listener and a router. [`Server::run`]
//! serves on one task while a second task waits for SIGINT/SIGTERM or for the
//! caller's [`CancellationToken`]. Either trigger starts a graceful drain that
//! is bounded by the drain timeout. `run` returns only after both tasks have
//! finished.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use miette::Diagnostic;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};


/// Default time in-flight requests get to finish once shutdown starts.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Server lifecycle errors.
#[derive(Error, Diagnostic, Debug)]
pub enum ServerError {
    #[error("Serve error: {0}")]
    #[diagnostic(code(blog::server::serve))]
    Serve(#[source] io::Error),

    #[error("In-flight requests did not finish within {0:?}")]
    #[diagnostic(
        code(blog::server::drain_timeout),
        help("Raise BACKEND_SHUTDOWN_TIMEOUT_SECS if handlers legitimately run this long.")
    )]
    DrainTimeout(Duration),

    #[error("Server task failed: {0}")]
    #[diagnostic(code(blog::server::join))]
    Join(#[from] JoinError),
}

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Idle,
    Serving,
    Draining,
    Stopped,
}

pub struct Server {
    listener: TcpListener,
    router: Router,
    drain_timeout: Duration,
    state: Arc<watch::Sender<ServerState>>,
}

impl Server {
    pub fn new(listener: TcpListener, router: Router) -> Self {
        let (state, _) = watch::channel(ServerState::Idle);
        Self {
            listener,
            router,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            state: Arc::new(state),
        }
    }

    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout = drain_timeout;
        self
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Subscribe to lifecycle state changes.
    pub fn state(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    /// Serve until `token` is cancelled or a shutdown signal arrives, then
    /// drain. Consumes the server, so a server shuts down at most once.
    pub async fn run(self, token: CancellationToken) -> Result<(), ServerError> {
        let token = token.child_token();
        let state = self.state;

        let mut tasks = JoinSet::new();
        tasks.spawn(serve(
            self.listener,
            self.router,
            self.drain_timeout,
            token.clone(),
            Arc::clone(&state),
        ));
        tasks.spawn(wait_for_shutdown(token.clone()));

        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            let result = joined.map_err(ServerError::from).and_then(|r| r);
            if let Err(e) = result {
                token.cancel();
                if first_error.is_none() {
                    first_error = Some(e);
                } else {
                    warn!("Additional server error after shutdown began: {}", e);
                }
            }
        }

        state.send_replace(ServerState::Stopped);
        match first_error {
            Some(e) => {
                error!("Server stopped abnormally: {}", e);
                Err(e)
            }
            None => {
                info!("Server stopped");
                Ok(())
            }
        }
    }
}

async fn serve(
    listener: TcpListener,
    router: Router,
    drain_timeout: Duration,
    token: CancellationToken,
    state: Arc<watch::Sender<ServerState>>,
) -> Result<(), ServerError> {
    // Whatever ends this task also releases the shutdown waiter.
    let _guard = token.clone().drop_guard();

    let server = axum::serve(listener, router)
        .with_graceful_shutdown(token.clone().cancelled_owned())
        .into_future();
    tokio::pin!(server);

    state.send_replace(ServerState::Serving);

    tokio::select! {
        result = &mut server => return result.map_err(ServerError::Serve),
        () = token.cancelled() => {}
    }

    state.send_replace(ServerState::Draining);
    info!("Draining in-flight requests (timeout {:?})", drain_timeout);

    match tokio::time::timeout(drain_timeout, server).await {
        Ok(result) => result.map_err(ServerError::Serve),
        Err(_) => Err(ServerError::DrainTimeout(drain_timeout)),
    }
}

async fn wait_for_shutdown(token: CancellationToken) -> Result<(), ServerError> {
    tokio::select! {
        () = shutdown_signal() => token.cancel(),
        () = token.cancelled() => info!("Shutdown requested"),
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => warn!("Received Ctrl+C, initiating graceful shutdown"),
        () = terminate => warn!("Received SIGTERM, initiating graceful shutdown"),
    }
}
