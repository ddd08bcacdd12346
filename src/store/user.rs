//! User repository operations.

use futures_util::future::BoxFuture;

use super::capability::{Arg, Execer};
use super::models::{NewUser, User, UserId, storage_precision};
use super::repository::{Repository, UserRegistrar};
use super::{StoreError, StoreResult};

const INSERT_USER: &str =
    "INSERT INTO user (name, password, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?)";

impl UserRegistrar for Repository {
    fn register_user<'a>(
        &'a self,
        db: &'a mut dyn Execer,
        user: NewUser,
    ) -> BoxFuture<'a, StoreResult<User>> {
        Box::pin(async move {
            let now = storage_precision(self.clock.now());

            let result = db
                .exec(
                    INSERT_USER,
                    vec![
                        Arg::from(user.name.as_str()),
                        Arg::from(user.password.as_str()),
                        Arg::from(user.role.as_str()),
                        Arg::from(now),
                        Arg::from(now),
                    ],
                )
                .await
                .map_err(|e| match e {
                    StoreError::Constraint { .. } => StoreError::AlreadyExists {
                        entity_type: "user".to_string(),
                        id: user.name.clone(),
                    },
                    other => other,
                })?;

            let id = result.last_insert_id.ok_or_else(|| StoreError::Database {
                message: "insert into user did not report an id".to_string(),
            })?;

            Ok(User {
                id: UserId(id),
                name: user.name,
                password: user.password,
                role: user.role,
                created_at: now,
                updated_at: now,
            })
        })
    }
}
