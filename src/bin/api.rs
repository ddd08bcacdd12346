//! Blog API server binary.
//!
//! Loads configuration from the environment, then hands control to the API
//! layer until the process receives SIGINT or SIGTERM.

use blog_backend::api::{self, ApiError};
use blog_backend::config::Config;
use clap::Parser;
use miette::Diagnostic;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("API server error: {0}")]
    #[diagnostic(code(blog::binary::api))]
    Api(#[from] ApiError),
}

#[tokio::main]
async fn main() -> Result<(), BinaryError> {
    let config = Config::parse();
    api::init_tracing(&config);

    api::run(config, CancellationToken::new()).await?;
    Ok(())
}
