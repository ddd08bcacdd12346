//! Persistence layer.
//!
//! # Architecture
//!
//! - `capability`: narrow store capabilities (`Execer`, `Queryer`, `Preparer`, `Beginner`)
//! - `connection`: connection provider with bounded retry and migrations
//! - `models`: domain entities (Article, User)
//! - `repository`: repository contracts and the SQL-backed `Repository`

mod article;
mod capability;
mod connection;
mod error;
mod models;
mod repository;
mod user;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod connection_test;

pub use capability::*;
pub use connection::*;
pub use error::{StoreError, StoreResult};
pub use models::*;
pub use repository::*;
