//! Request handlers.
//!
//! Every JSON body leaves through [`respond_json`], so a value that fails to
//! serialize is logged and answered with a generic 500 instead of a broken
//! response.

mod articles;
mod system;
mod users;


pub use articles::*;
pub use system::*;
pub use users::*;

use axum::{
    body::Body,
    extract::rejection::JsonRejection,
    http::{StatusCode, header},
    response::Response,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

const INTERNAL_ERROR_BODY: &str = r#"{"message":"Internal Server Error"}"#;

/// Error response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "validation failed")]
    pub message: String,
    /// Individual problems, omitted when empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[schema(example = json!(["title is required"]))]
    pub details: Vec<String>,
}

/// Identity assigned to a newly stored entity
#[derive(Debug, Serialize, ToSchema)]
pub struct IdResponse {
    #[schema(example = 1)]
    pub id: i64,
}

/// Serialize `body` as the JSON response with `status`.
pub fn respond_json<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => json_response(status, Body::from(bytes)),
        Err(e) => {
            error!("Failed to encode response body: {}", e);
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                Body::from(INTERNAL_ERROR_BODY),
            )
        }
    }
}

pub fn respond_error(
    status: StatusCode,
    message: impl Into<String>,
    details: Vec<String>,
) -> Response {
    respond_json(
        status,
        &ErrorResponse {
            message: message.into(),
            details,
        },
    )
}

/// 400 for a body that could not be decoded.
pub(crate) fn bad_body(rejection: JsonRejection) -> Response {
    respond_error(
        StatusCode::BAD_REQUEST,
        "invalid request body",
        vec![rejection.body_text()],
    )
}

fn json_response(status: StatusCode, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    response
}

/// Collects a "<field> is required" detail for every missing or blank field.
pub(crate) fn require<'a>(
    details: &mut Vec<String>,
    field: &str,
    value: &'a Option<String>,
) -> Option<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => value.as_deref(),
        _ => {
            details.push(format!("{} is required", field));
            None
        }
    }
}
