//! Service doubles and request helpers for handler tests.

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use futures_util::future::BoxFuture;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use super::{AppState, create_router};
use crate::clock::{Clocker, FixedClocker};
use crate::service::{
    AddArticleService, ListArticlesService, RegisterUserService, ServiceError, ServiceResult,
};
use crate::store::{Article, ArticleId, ArticleStatus, StoreError, User, UserId};

/// Canned service behaviour shared by all three service traits.
#[derive(Default)]
pub(crate) struct StubServices {
    pub articles: Vec<Article>,
    pub fail_list: bool,
    pub fail_add: bool,
    pub duplicate_user: bool,
    pub added_titles: Mutex<Vec<String>>,
}

impl StubServices {
    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            articles,
            ..Default::default()
        }
    }

    pub fn into_app(self) -> (Router, Arc<Self>) {
        let stub = Arc::new(self);
        let state = AppState::new(stub.clone(), stub.clone(), stub.clone());
        (create_router(state, false), stub)
    }
}

pub(crate) fn article(id: i64, title: &str, status: ArticleStatus) -> Article {
    Article {
        id: ArticleId(id),
        title: title.to_string(),
        status,
        created_at: FixedClocker.now(),
    }
}

impl AddArticleService for StubServices {
    fn add_article<'a>(&'a self, title: &'a str) -> BoxFuture<'a, ServiceResult<Article>> {
        Box::pin(async move {
            self.added_titles.lock().unwrap().push(title.to_string());
            if self.fail_add {
                return Err(ServiceError::Register(StoreError::Database {
                    message: "insert failed".to_string(),
                }));
            }
            Ok(article(42, title, ArticleStatus::Draft))
        })
    }
}

impl ListArticlesService for StubServices {
    fn list_articles(&self) -> BoxFuture<'_, ServiceResult<Vec<Article>>> {
        Box::pin(async move {
            if self.fail_list {
                return Err(ServiceError::List(StoreError::Database {
                    message: "error from mock".to_string(),
                }));
            }
            Ok(self.articles.clone())
        })
    }
}

impl RegisterUserService for StubServices {
    fn register_user<'a>(
        &'a self,
        name: &'a str,
        password: &'a str,
        role: &'a str,
    ) -> BoxFuture<'a, ServiceResult<User>> {
        Box::pin(async move {
            if self.duplicate_user {
                return Err(ServiceError::RegisterUser(StoreError::AlreadyExists {
                    entity_type: "user".to_string(),
                    id: name.to_string(),
                }));
            }
            Ok(User {
                id: UserId(9),
                name: name.to_string(),
                password: password.to_string(),
                role: role.to_string(),
                created_at: FixedClocker.now(),
                updated_at: FixedClocker.now(),
            })
        })
    }
}

pub(crate) async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub(crate) fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub(crate) fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

/// Helper to parse JSON response body
pub(crate) async fn json_body(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
