//! User registration handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use tracing::{error, instrument, warn};
use utoipa::ToSchema;

use super::{ErrorResponse, IdResponse, bad_body, require, respond_error, respond_json};
use crate::api::AppState;

/// Register user request DTO
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    #[schema(example = "alice")]
    pub name: Option<String>,
    #[schema(example = "s3cret")]
    pub password: Option<String>,
    #[schema(example = "admin")]
    pub role: Option<String>,
}

/// A registration that passed validation.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidUser<'a> {
    pub name: &'a str,
    pub password: &'a str,
    pub role: &'a str,
}

impl RegisterUserRequest {
    pub fn validate(&self) -> Result<ValidUser<'_>, Vec<String>> {
        let mut details = Vec::new();
        let name = require(&mut details, "name", &self.name);
        let password = require(&mut details, "password", &self.password);
        let role = require(&mut details, "role", &self.role);

        match (name, password, role) {
            (Some(name), Some(password), Some(role)) => Ok(ValidUser {
                name,
                password,
                role,
            }),
            _ => Err(details),
        }
    }
}

/// Register a user
///
/// User names are unique; registering a taken name is a conflict.
#[utoipa::path(
    post,
    path = "/register",
    tag = "users",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "User registered", body = IdResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "User name already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_body(rejection),
    };
    let user = match request.validate() {
        Ok(user) => user,
        Err(details) => {
            return respond_error(StatusCode::BAD_REQUEST, "validation failed", details);
        }
    };

    match state
        .register_user()
        .register_user(user.name, user.password, user.role)
        .await
    {
        Ok(registered) => respond_json(StatusCode::OK, &IdResponse { id: registered.id.0 }),
        Err(e) if e.is_already_exists() => {
            warn!("{}", e);
            respond_error(
                StatusCode::CONFLICT,
                format!("User '{}' already exists", user.name),
                vec![],
            )
        }
        Err(e) => {
            error!("{}", e);
            respond_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), vec![])
        }
    }
}
