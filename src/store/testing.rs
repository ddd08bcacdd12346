//! Shared fixtures for store tests.

use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use sqlx::AnyPool;

use super::{
    Arg, Backend, Connector, ExecResult, Execer, StoreError, StoreResult, UrlConnector, migrate,
};

/// Fresh in-memory SQLite database with the schema applied.
pub(crate) async fn memory_pool() -> AnyPool {
    let pool = memory_connector()
        .connect()
        .await
        .expect("Failed to open in-memory database");
    migrate(&pool, Backend::Sqlite)
        .await
        .expect("Migration should succeed");
    pool
}

pub(crate) fn memory_connector() -> UrlConnector {
    UrlConnector::new("sqlite::memory:").with_max_connections(1)
}

/// Records every statement and answers with a canned result.
#[derive(Clone, Default)]
pub(crate) struct RecordingExecer {
    pub calls: Arc<Mutex<Vec<(String, Vec<Arg>)>>>,
    pub last_insert_id: Option<i64>,
    pub fail_with_constraint: bool,
}

impl RecordingExecer {
    pub fn returning(last_insert_id: Option<i64>) -> Self {
        Self {
            last_insert_id,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<Arg>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Execer for RecordingExecer {
    fn exec<'a>(
        &'a mut self,
        sql: &'a str,
        args: Vec<Arg>,
    ) -> BoxFuture<'a, StoreResult<ExecResult>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push((sql.to_string(), args));
            if self.fail_with_constraint {
                return Err(StoreError::Constraint {
                    message: "Duplicate entry".to_string(),
                });
            }
            Ok(ExecResult {
                rows_affected: 1,
                last_insert_id: self.last_insert_id,
            })
        })
    }
}
