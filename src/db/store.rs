use async_trait::async_trait;

use crate::db::models::{NewUser, User};
use crate::error::AppError;

/// Boundary to the credential store. The authenticator only needs these
/// three operations; the Postgres implementation lives in
/// [`crate::db::DbOperations`].
///
/// Username lookup is case-insensitive; storage preserves the case the
/// user registered with. Insert uniqueness is enforced by the store's
/// own constraint, which stays authoritative under concurrent
/// registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, AppError>;

    async fn insert_user(&self, user: &NewUser, password_hash: &str) -> Result<User, AppError>;
}
