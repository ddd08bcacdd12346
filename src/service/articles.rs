//! Article services.

use futures_util::future::BoxFuture;

use super::{AddArticleService, ListArticlesService, ServiceError, ServiceResult};
use crate::store::{Article, ArticleAdder, ArticleLister, Execer, NewArticle, Queryer};

/// Registers new articles as drafts.
pub struct AddArticle<E, R> {
    db: E,
    repo: R,
}

impl<E, R> AddArticle<E, R> {
    pub fn new(db: E, repo: R) -> Self {
        Self { db, repo }
    }
}

impl<E, R> AddArticleService for AddArticle<E, R>
where
    E: Execer + Clone + Sync,
    R: ArticleAdder,
{
    fn add_article<'a>(&'a self, title: &'a str) -> BoxFuture<'a, ServiceResult<Article>> {
        Box::pin(async move {
            let mut db = self.db.clone();
            self.repo
                .add_article(&mut db, NewArticle::draft(title))
                .await
                .map_err(ServiceError::Register)
        })
    }
}

/// Lists stored articles.
pub struct ListArticle<Q, R> {
    db: Q,
    repo: R,
}

impl<Q, R> ListArticle<Q, R> {
    pub fn new(db: Q, repo: R) -> Self {
        Self { db, repo }
    }
}

impl<Q, R> ListArticlesService for ListArticle<Q, R>
where
    Q: Queryer + Clone + Sync,
    R: ArticleLister,
{
    fn list_articles(&self) -> BoxFuture<'_, ServiceResult<Vec<Article>>> {
        Box::pin(async move {
            let mut db = self.db.clone();
            self.repo
                .list_articles(&mut db)
                .await
                .map_err(ServiceError::List)
        })
    }
}
