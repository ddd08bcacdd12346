//! Article repository operations.

use futures_util::future::BoxFuture;
use sqlx::Row;
use sqlx::any::AnyRow;

use super::capability::{Arg, Execer, Queryer};
use super::models::{
    Article, ArticleId, ArticleStatus, NewArticle, parse_timestamp, storage_precision,
};
use super::repository::{ArticleAdder, ArticleLister, Repository};
use super::{StoreError, StoreResult};

const INSERT_ARTICLE: &str = "INSERT INTO article (title, status, created_at) VALUES (?, ?, ?)";

const SELECT_ARTICLES: &str = "SELECT id, title, status, created_at FROM article ORDER BY id";

fn article_from_row(row: &AnyRow) -> StoreResult<Article> {
    let status: String = row.try_get("status")?;
    let status = status
        .parse::<ArticleStatus>()
        .map_err(|message| StoreError::InvalidData { message })?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Article {
        id: ArticleId(row.try_get("id")?),
        title: row.try_get("title")?,
        status,
        created_at: parse_timestamp(&created_at)?,
    })
}

impl ArticleAdder for Repository {
    fn add_article<'a>(
        &'a self,
        db: &'a mut dyn Execer,
        article: NewArticle,
    ) -> BoxFuture<'a, StoreResult<Article>> {
        Box::pin(async move {
            let created_at = storage_precision(self.clock.now());

            let result = db
                .exec(
                    INSERT_ARTICLE,
                    vec![
                        Arg::from(article.title.as_str()),
                        Arg::from(article.status.as_str()),
                        Arg::from(created_at),
                    ],
                )
                .await?;

            let id = result.last_insert_id.ok_or_else(|| StoreError::Database {
                message: "insert into article did not report an id".to_string(),
            })?;

            Ok(Article {
                id: ArticleId(id),
                title: article.title,
                status: article.status,
                created_at,
            })
        })
    }
}

impl ArticleLister for Repository {
    fn list_articles<'a>(
        &'a self,
        db: &'a mut dyn Queryer,
    ) -> BoxFuture<'a, StoreResult<Vec<Article>>> {
        Box::pin(async move {
            let rows = db.query(SELECT_ARTICLES, vec![]).await?;
            rows.iter().map(article_from_row).collect()
        })
    }
}
