//! Application state for the API server.

use std::sync::Arc;

use sqlx::AnyPool;

use crate::clock::Clocker;
use crate::service::{
    AddArticle, AddArticleService, ListArticle, ListArticlesService, RegisterUser,
    RegisterUserService,
};
use crate::store::Repository;

/// Shared application state.
///
/// Handlers only see the service traits, so any implementation (including
/// test doubles) can be injected through [`AppState::new`].
#[derive(Clone)]
pub struct AppState {
    add_article: Arc<dyn AddArticleService>,
    list_articles: Arc<dyn ListArticlesService>,
    register_user: Arc<dyn RegisterUserService>,
    list_created_at: bool,
}

impl AppState {
    pub fn new(
        add_article: Arc<dyn AddArticleService>,
        list_articles: Arc<dyn ListArticlesService>,
        register_user: Arc<dyn RegisterUserService>,
    ) -> Self {
        Self {
            add_article,
            list_articles,
            register_user,
            list_created_at: false,
        }
    }

    /// Wire the SQL-backed services over `pool`, stamping rows with `clock`.
    pub fn from_pool(pool: AnyPool, clock: impl Clocker + 'static) -> Self {
        let repo = Repository::new(clock);
        Self::new(
            Arc::new(AddArticle::new(pool.clone(), repo.clone())),
            Arc::new(ListArticle::new(pool.clone(), repo.clone())),
            Arc::new(RegisterUser::new(pool, repo)),
        )
    }

    /// Include `created_at` in article list responses.
    pub fn with_list_created_at(mut self, enabled: bool) -> Self {
        self.list_created_at = enabled;
        self
    }

    pub fn add_article(&self) -> &dyn AddArticleService {
        self.add_article.as_ref()
    }

    pub fn list_articles(&self) -> &dyn ListArticlesService {
        self.list_articles.as_ref()
    }

    pub fn register_user(&self) -> &dyn RegisterUserService {
        self.register_user.as_ref()
    }

    pub fn list_created_at(&self) -> bool {
        self.list_created_at
    }
}
