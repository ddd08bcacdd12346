//! API route configuration.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::handlers::{
    self, AddArticleRequest, ArticleResponse, ErrorResponse, HealthResponse, IdResponse,
    RegisterUserRequest,
};
use super::state::AppState;
use crate::store::ArticleStatus;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog API",
        version = "0.1.0",
        description = "Articles and users for the blog backend",
        license(name = "GPL-2.0")
    ),
    paths(
        handlers::health,
        handlers::add_article,
        handlers::list_articles,
        handlers::register_user,
    ),
    components(
        schemas(
            HealthResponse,
            ArticleResponse,
            ArticleStatus,
            AddArticleRequest,
            RegisterUserRequest,
            IdResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health endpoints"),
        (name = "articles", description = "Article endpoints"),
        (name = "users", description = "User registration endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router. `docs` mounts the OpenAPI UI under `/docs`.
pub fn create_router(state: AppState, docs: bool) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/articles",
            get(handlers::list_articles).post(handlers::add_article),
        )
        .route("/register", post(handlers::register_user));

    if docs {
        router = router.merge(Scalar::with_url("/docs", ApiDoc::openapi()));
    }

    router
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
