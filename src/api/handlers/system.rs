//! Liveness handler.

use axum::{http::StatusCode, response::Response};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use super::respond_json;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    #[schema(example = "ok")]
    pub status: String,
}

/// Health check endpoint
///
/// Returns a static status so load balancers can check the process
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Health check successful", body = HealthResponse)
    )
)]
#[instrument]
pub async fn health() -> Response {
    respond_json(
        StatusCode::OK,
        &HealthResponse {
            status: "ok".to_string(),
        },
    )
}
