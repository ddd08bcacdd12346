//! Article handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};
use utoipa::ToSchema;

use super::{ErrorResponse, IdResponse, bad_body, require, respond_error, respond_json};
use crate::api::AppState;
use crate::store::{Article, ArticleStatus, format_timestamp};

// =============================================================================
// DTOs
// =============================================================================

/// Article response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Hello, world")]
    pub title: String,
    pub status: ArticleStatus,
    /// Only present when the list projection includes timestamps
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "2024-09-24 12:34:56")]
    pub created_at: Option<String>,
}

impl ArticleResponse {
    pub fn project(article: Article, with_created_at: bool) -> Self {
        Self {
            id: article.id.0,
            title: article.title,
            status: article.status,
            created_at: with_created_at.then(|| format_timestamp(&article.created_at)),
        }
    }
}

/// Create article request DTO
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AddArticleRequest {
    #[schema(example = "Hello, world")]
    pub title: Option<String>,
    /// One of draft, published, withdrawn
    #[schema(example = "draft")]
    pub status: Option<String>,
}

/// A create request that passed validation.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidArticle<'a> {
    pub title: &'a str,
    pub status: ArticleStatus,
}

impl AddArticleRequest {
    pub fn validate(&self) -> Result<ValidArticle<'_>, Vec<String>> {
        let mut details = Vec::new();
        let title = require(&mut details, "title", &self.title);
        let status = require(&mut details, "status", &self.status).and_then(|raw| {
            raw.parse::<ArticleStatus>()
                .map_err(|_| {
                    details.push(format!(
                        "status must be one of draft, published, withdrawn (got '{}')",
                        raw
                    ))
                })
                .ok()
        });

        match (title, status) {
            (Some(title), Some(status)) if details.is_empty() => {
                Ok(ValidArticle { title, status })
            }
            _ => Err(details),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Create an article
///
/// New articles are always stored as drafts; the requested status is only validated.
#[utoipa::path(
    post,
    path = "/articles",
    tag = "articles",
    request_body = AddArticleRequest,
    responses(
        (status = 200, description = "Article created", body = IdResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn add_article(
    State(state): State<AppState>,
    payload: Result<Json<AddArticleRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_body(rejection),
    };
    let article = match request.validate() {
        Ok(article) => article,
        Err(details) => {
            return respond_error(StatusCode::BAD_REQUEST, "validation failed", details);
        }
    };

    match state.add_article().add_article(article.title).await {
        Ok(article) => respond_json(StatusCode::OK, &IdResponse { id: article.id.0 }),
        Err(e) => {
            error!("{}", e);
            respond_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), vec![])
        }
    }
}

/// List articles
///
/// Returns every stored article in insertion order
#[utoipa::path(
    get,
    path = "/articles",
    tag = "articles",
    responses(
        (status = 200, description = "List of articles", body = Vec<ArticleResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_articles(State(state): State<AppState>) -> Response {
    match state.list_articles().list_articles().await {
        Ok(articles) => {
            let with_created_at = state.list_created_at();
            let body: Vec<ArticleResponse> = articles
                .into_iter()
                .map(|a| ArticleResponse::project(a, with_created_at))
                .collect();
            respond_json(StatusCode::OK, &body)
        }
        Err(e) => {
            error!("{}", e);
            respond_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), vec![])
        }
    }
}
