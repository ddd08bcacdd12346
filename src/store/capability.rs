//! Store capability sets.
//!
//! Repository code asks for the narrowest capability it needs instead of a
//! concrete handle. The pooled handle, a single connection and an open
//! transaction all implement the same traits, so an operation written
//! against `&mut dyn Execer` runs unchanged inside or outside a transaction.

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use sqlx::any::{Any, AnyArguments, AnyQueryResult, AnyRow};
use sqlx::query::Query;
use sqlx::{AnyConnection, AnyPool, Column, Executor, Pool, Statement, Transaction};

use super::models::format_timestamp;
use super::StoreResult;

/// A value bound to a statement placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Int(i64),
    Text(String),
    /// Bound in storage format, see [`super::TIMESTAMP_FORMAT`].
    Timestamp(DateTime<Utc>),
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Arg::Int(v)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Text(v.to_string())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Text(v)
    }
}

impl From<DateTime<Utc>> for Arg {
    fn from(v: DateTime<Utc>) -> Self {
        Arg::Timestamp(v)
    }
}

/// Outcome of a mutating statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Auto-increment value assigned by the insert, when the backend reports one.
    pub last_insert_id: Option<i64>,
}

impl From<AnyQueryResult> for ExecResult {
    fn from(result: AnyQueryResult) -> Self {
        Self {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        }
    }
}

/// Metadata of a statement the backend has parsed without running it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedStatement {
    pub sql: String,
    pub columns: Vec<String>,
}

/// Can run a mutating statement.
pub trait Execer: Send {
    fn exec<'a>(&'a mut self, sql: &'a str, args: Vec<Arg>)
    -> BoxFuture<'a, StoreResult<ExecResult>>;
}

/// Can have statements prepared.
pub trait Preparer: Send {
    fn prepare<'a>(&'a mut self, sql: &'a str) -> BoxFuture<'a, StoreResult<PreparedStatement>>;
}

/// Can run read statements.
pub trait Queryer: Preparer {
    fn query<'a>(&'a mut self, sql: &'a str, args: Vec<Arg>)
    -> BoxFuture<'a, StoreResult<Vec<AnyRow>>>;

    fn query_optional<'a>(
        &'a mut self,
        sql: &'a str,
        args: Vec<Arg>,
    ) -> BoxFuture<'a, StoreResult<Option<AnyRow>>>;
}

/// Can open an atomic unit of work.
pub trait Beginner: Send + Sync {
    fn begin_tx(&self) -> BoxFuture<'_, StoreResult<Transaction<'static, Any>>>;
}

fn bind_args(sql: &str, args: Vec<Arg>) -> Query<'_, Any, AnyArguments<'_>> {
    args.into_iter()
        .fold(sqlx::query(sql), |query, arg| match arg {
            Arg::Int(v) => query.bind(v),
            Arg::Text(v) => query.bind(v),
            Arg::Timestamp(ts) => query.bind(format_timestamp(&ts)),
        })
}

/// Backend name the `Any` driver reports for SQLite connections.
const SQLITE_BACKEND: &str = "SQLite";

/// Run a mutating statement on one connection.
///
/// The SQLite `Any` driver never reports the inserted row id, so after an
/// insert it is read back with `last_insert_rowid()` on the same connection.
async fn execute(
    conn: &mut AnyConnection,
    sql: &str,
    args: Vec<Arg>,
) -> StoreResult<ExecResult> {
    let mut result = ExecResult::from(bind_args(sql, args).execute(&mut *conn).await?);

    if result.last_insert_id.is_none()
        && result.rows_affected > 0
        && is_insert(sql)
        && conn.backend_name() == SQLITE_BACKEND
    {
        let id: i64 = sqlx::query_scalar("SELECT last_insert_rowid()")
            .fetch_one(&mut *conn)
            .await?;
        result.last_insert_id = Some(id);
    }

    Ok(result)
}

fn is_insert(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|verb| verb.eq_ignore_ascii_case("insert"))
}

async fn fetch_all<'e, E>(executor: E, sql: &'e str, args: Vec<Arg>) -> StoreResult<Vec<AnyRow>>
where
    E: Executor<'e, Database = Any>,
{
    Ok(bind_args(sql, args).fetch_all(executor).await?)
}

async fn fetch_optional<'e, E>(
    executor: E,
    sql: &'e str,
    args: Vec<Arg>,
) -> StoreResult<Option<AnyRow>>
where
    E: Executor<'e, Database = Any>,
{
    Ok(bind_args(sql, args).fetch_optional(executor).await?)
}

async fn prepare<'e, E>(executor: E, sql: &'e str) -> StoreResult<PreparedStatement>
where
    E: Executor<'e, Database = Any>,
{
    let statement = executor.prepare(sql).await?;
    Ok(PreparedStatement {
        sql: sql.to_string(),
        columns: statement
            .columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect(),
    })
}

/// Implements the read-side capability traits for a handle type; `$executor`
/// turns `self: &mut Self` into something that implements `sqlx::Executor`.
macro_rules! capabilities {
    ($ty:ty, |$this:ident| $executor:expr) => {
        impl Preparer for $ty {
            fn prepare<'a>(
                &'a mut self,
                sql: &'a str,
            ) -> BoxFuture<'a, StoreResult<PreparedStatement>> {
                let $this = self;
                Box::pin(prepare($executor, sql))
            }
        }

        impl Queryer for $ty {
            fn query<'a>(
                &'a mut self,
                sql: &'a str,
                args: Vec<Arg>,
            ) -> BoxFuture<'a, StoreResult<Vec<AnyRow>>> {
                let $this = self;
                Box::pin(fetch_all($executor, sql, args))
            }

            fn query_optional<'a>(
                &'a mut self,
                sql: &'a str,
                args: Vec<Arg>,
            ) -> BoxFuture<'a, StoreResult<Option<AnyRow>>> {
                let $this = self;
                Box::pin(fetch_optional($executor, sql, args))
            }
        }
    };
}

capabilities!(AnyPool, |pool| &*pool);
capabilities!(AnyConnection, |conn| &mut *conn);
capabilities!(Transaction<'static, Any>, |tx| &mut **tx);

impl Execer for AnyPool {
    fn exec<'a>(
        &'a mut self,
        sql: &'a str,
        args: Vec<Arg>,
    ) -> BoxFuture<'a, StoreResult<ExecResult>> {
        Box::pin(async move {
            let mut conn = self.acquire().await?;
            execute(&mut conn, sql, args).await
        })
    }
}

impl Execer for AnyConnection {
    fn exec<'a>(
        &'a mut self,
        sql: &'a str,
        args: Vec<Arg>,
    ) -> BoxFuture<'a, StoreResult<ExecResult>> {
        Box::pin(execute(self, sql, args))
    }
}

impl Execer for Transaction<'static, Any> {
    fn exec<'a>(
        &'a mut self,
        sql: &'a str,
        args: Vec<Arg>,
    ) -> BoxFuture<'a, StoreResult<ExecResult>> {
        Box::pin(execute(&mut **self, sql, args))
    }
}

impl Beginner for AnyPool {
    fn begin_tx(&self) -> BoxFuture<'_, StoreResult<Transaction<'static, Any>>> {
        Box::pin(async move { Ok(Pool::begin(self).await?) })
    }
}
