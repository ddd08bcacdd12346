//! Repository contracts.
//!
//! Each operation takes the narrowest store capability it needs, so callers
//! decide whether it runs against the pool or inside a transaction.

use std::sync::Arc;

use futures_util::future::BoxFuture;

use super::capability::{Execer, Queryer};
use super::models::{Article, NewArticle, NewUser, User};
use super::StoreResult;
use crate::clock::Clocker;

/// Inserts articles.
pub trait ArticleAdder: Send + Sync {
    /// Insert `article`, stamping its creation time and returning it with
    /// the storage-assigned id.
    fn add_article<'a>(
        &'a self,
        db: &'a mut dyn Execer,
        article: NewArticle,
    ) -> BoxFuture<'a, StoreResult<Article>>;
}

/// Reads articles.
pub trait ArticleLister: Send + Sync {
    /// All articles in insertion order; empty when there are none.
    fn list_articles<'a>(&'a self, db: &'a mut dyn Queryer)
    -> BoxFuture<'a, StoreResult<Vec<Article>>>;
}

/// Inserts users.
pub trait UserRegistrar: Send + Sync {
    /// Insert `user`. A name that is already taken fails with
    /// [`super::StoreError::AlreadyExists`].
    fn register_user<'a>(
        &'a self,
        db: &'a mut dyn Execer,
        user: NewUser,
    ) -> BoxFuture<'a, StoreResult<User>>;
}

/// SQL-backed repository.
///
/// Holds no state besides its time source.
#[derive(Clone)]
pub struct Repository {
    pub(crate) clock: Arc<dyn Clocker>,
}

impl Repository {
    pub fn new(clock: impl Clocker + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
        }
    }
}
