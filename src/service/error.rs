//! Service error types.

use miette::Diagnostic;
use thiserror::Error;

use crate::store::StoreError;

/// Service operation errors. Each variant names the failed operation and
/// keeps the underlying store error as its source.
#[derive(Error, Diagnostic, Debug)]
pub enum ServiceError {
    #[error("failed to register: {0}")]
    #[diagnostic(code(blog::service::add_article))]
    Register(#[source] StoreError),

    #[error("failed to list: {0}")]
    #[diagnostic(code(blog::service::list_articles))]
    List(#[source] StoreError),

    #[error("failed to register user: {0}")]
    #[diagnostic(code(blog::service::register_user))]
    RegisterUser(#[source] StoreError),
}

impl ServiceError {
    pub fn store_error(&self) -> &StoreError {
        match self {
            ServiceError::Register(e) | ServiceError::List(e) | ServiceError::RegisterUser(e) => e,
        }
    }

    pub fn is_already_exists(&self) -> bool {
        self.store_error().is_already_exists()
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
