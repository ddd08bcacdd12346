//! User services.

use futures_util::future::BoxFuture;

use super::{RegisterUserService, ServiceError, ServiceResult};
use crate::store::{Execer, NewUser, User, UserRegistrar};

/// Registers users.
pub struct RegisterUser<E, R> {
    db: E,
    repo: R,
}

impl<E, R> RegisterUser<E, R> {
    pub fn new(db: E, repo: R) -> Self {
        Self { db, repo }
    }
}

impl<E, R> RegisterUserService for RegisterUser<E, R>
where
    E: Execer + Clone + Sync,
    R: UserRegistrar,
{
    fn register_user<'a>(
        &'a self,
        name: &'a str,
        password: &'a str,
        role: &'a str,
    ) -> BoxFuture<'a, ServiceResult<User>> {
        Box::pin(async move {
            let user = NewUser {
                name: name.to_string(),
                password: password.to_string(),
                role: role.to_string(),
            };
            let mut db = self.db.clone();
            self.repo
                .register_user(&mut db, user)
                .await
                .map_err(ServiceError::RegisterUser)
        })
    }
}
