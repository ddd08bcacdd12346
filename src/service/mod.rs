//! Service layer.
//!
//! Services combine an injected store handle with an injected repository and
//! apply business defaults. Handlers depend on the object-safe traits below,
//! never on the concrete services, so they can be exercised with test doubles.

mod articles;
mod error;
mod users;


use futures_util::future::BoxFuture;

pub use articles::{AddArticle, ListArticle};
pub use error::{ServiceError, ServiceResult};
pub use users::RegisterUser;

use crate::store::{Article, User};

/// Adds an article.
pub trait AddArticleService: Send + Sync {
    /// Store a new article titled `title`. The article always starts as a draft.
    fn add_article<'a>(&'a self, title: &'a str) -> BoxFuture<'a, ServiceResult<Article>>;
}

/// Lists articles.
pub trait ListArticlesService: Send + Sync {
    fn list_articles(&self) -> BoxFuture<'_, ServiceResult<Vec<Article>>>;
}

/// Registers a user.
pub trait RegisterUserService: Send + Sync {
    fn register_user<'a>(
        &'a self,
        name: &'a str,
        password: &'a str,
        role: &'a str,
    ) -> BoxFuture<'a, ServiceResult<User>>;
}
