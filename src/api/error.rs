//! API startup errors.

use std::io;
use std::net::SocketAddr;

use miette::Diagnostic;
use thiserror::Error;

use crate::server::ServerError;
use crate::store::StoreError;

#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Store error: {0}")]
    #[diagnostic(code(blog::api::store))]
    Store(#[from] StoreError),

    #[error("Failed to bind {addr}: {source}")]
    #[diagnostic(
        code(blog::api::bind),
        help("Check that BACKEND_HOST/BACKEND_PORT are free and permitted.")
    )]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(blog::api::server))]
    Server(#[from] ServerError),
}
