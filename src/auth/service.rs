use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password, MAX_PASSWORD_LENGTH};
use crate::auth::token::TokenIssuer;
use crate::db::models::{NewUser, PublicUser};
use crate::db::store::UserStore;
use crate::error::{AppError, AuthError, DatabaseError};

/// The three-way login outcome. The two failure cases are product
/// data, not transport errors, and must stay distinguishable.
#[derive(Debug, PartialEq)]
pub enum LoginOutcome {
    UnknownUser,
    WrongPassword,
    Success {
        access_token: String,
        username: String,
        user_id: i64,
    },
}

pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, tokens: Arc<TokenIssuer>) -> Self {
        Self { store, tokens }
    }

    /// Registers a new account. Username uniqueness is checked before
    /// the costly hash computation, but the store's unique constraint
    /// remains the authority: a concurrent duplicate insert still
    /// surfaces as `DuplicateUsername`.
    pub async fn register(&self, new_user: &NewUser) -> Result<PublicUser, AppError> {
        if new_user.password.is_empty() {
            return Err(AppError::ValidationError("Password must not be empty".into()));
        }
        if new_user.password.len() > MAX_PASSWORD_LENGTH {
            return Err(AppError::ValidationError(format!(
                "Password must be at most {} characters",
                MAX_PASSWORD_LENGTH
            )));
        }

        if self
            .store
            .find_by_username(&new_user.user_name)
            .await?
            .is_some()
        {
            warn!("Registration rejected, username taken: {}", new_user.user_name);
            return Err(AuthError::DuplicateUsername.into());
        }

        let password_hash = hash_password(&new_user.password)?;

        let created = match self.store.insert_user(new_user, &password_hash).await {
            Ok(user) => user,
            Err(AppError::DatabaseError(DatabaseError::Duplicate)) => {
                return Err(AuthError::DuplicateUsername.into());
            }
            Err(e) => return Err(e),
        };

        info!("Registered user {} (id {})", created.user_name, created.user_id);
        Ok(created.public())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let user = match self.store.find_by_username(username).await? {
            Some(user) => user,
            None => {
                info!("Login failed, unknown user: {}", username);
                return Ok(LoginOutcome::UnknownUser);
            }
        };

        if !verify_password(password, &user.password_hash) {
            info!("Login failed, wrong password for user: {}", username);
            return Ok(LoginOutcome::WrongPassword);
        }

        let access_token = self.tokens.issue(user.user_id, &user.user_name)?;
        info!("Login successful for user {} (id {})", user.user_name, user.user_id);

        Ok(LoginOutcome::Success {
            access_token,
            username: user.user_name,
            user_id: user.user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::User;
    use crate::db::store::MockUserStore;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn issuer() -> Arc<TokenIssuer> {
        Arc::new(TokenIssuer::new(
            "test-secret-key-must-be-at-least-32-chars!".to_string(),
            2,
        ))
    }

    fn new_user(name: &str, password: &str) -> NewUser {
        NewUser {
            user_name: name.to_string(),
            password: password.to_string(),
            user_email: format!("{}@example.com", name),
            contact_num_1: "5550001".to_string(),
            contact_num_2: None,
        }
    }

    fn stored_user(id: i64, name: &str, password_hash: &str) -> User {
        User {
            user_id: id,
            user_name: name.to_string(),
            password_hash: password_hash.to_string(),
            user_email: format!("{}@example.com", name),
            contact_num_1: "5550001".to_string(),
            contact_num_2: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut store = MockUserStore::new();
        store
            .expect_find_by_username()
            .with(eq("alice"))
            .returning(|_| Ok(None));
        store
            .expect_insert_user()
            .withf(|user, hash| {
                // Hash must be self-describing and never the plaintext.
                user.user_name == "alice"
                    && hash.starts_with("$argon2id$")
                    && hash != user.password
            })
            .returning(|user, hash| Ok(stored_user(1, &user.user_name, hash)));

        let service = AuthService::new(Arc::new(store), issuer());
        let public = service.register(&new_user("alice", "sw0rdf1sh!")).await.unwrap();

        assert_eq!(public.user_id, 1);
        assert_eq!(public.user_name, "alice");
    }

    #[tokio::test]
    async fn test_register_duplicate_username_skips_hashing() {
        let mut store = MockUserStore::new();
        store
            .expect_find_by_username()
            .with(eq("alice"))
            .returning(|_| Ok(Some(stored_user(1, "alice", "$argon2id$existing"))));
        // No insert expectation: registration must stop at the
        // uniqueness check.

        let service = AuthService::new(Arc::new(store), issuer());
        let err = service.register(&new_user("alice", "whatever1")).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::AuthError(AuthError::DuplicateUsername)
        ));
    }

    #[tokio::test]
    async fn test_register_concurrent_duplicate_maps_to_duplicate_username() {
        // Pre-check passes but the store's unique constraint fires on
        // insert, as it would under a registration race.
        let mut store = MockUserStore::new();
        store.expect_find_by_username().returning(|_| Ok(None));
        store
            .expect_insert_user()
            .returning(|_, _| Err(AppError::DatabaseError(DatabaseError::Duplicate)));

        let service = AuthService::new(Arc::new(store), issuer());
        let err = service.register(&new_user("alice", "whatever1")).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::AuthError(AuthError::DuplicateUsername)
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_empty_password() {
        let store = MockUserStore::new();
        let service = AuthService::new(Arc::new(store), issuer());

        let err = service.register(&new_user("alice", "")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let mut store = MockUserStore::new();
        store
            .expect_find_by_username()
            .with(eq("ghost"))
            .returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(store), issuer());
        let outcome = service.login("ghost", "irrelevant").await.unwrap();

        assert_eq!(outcome, LoginOutcome::UnknownUser);
    }

    #[tokio::test]
    async fn test_login_wrong_password_distinct_from_unknown_user() {
        let hash = hash_password("right-password").unwrap();
        let mut store = MockUserStore::new();
        store
            .expect_find_by_username()
            .with(eq("alice"))
            .returning(move |_| Ok(Some(stored_user(1, "alice", &hash))));

        let service = AuthService::new(Arc::new(store), issuer());
        let outcome = service.login("alice", "wrong-password").await.unwrap();

        assert_eq!(outcome, LoginOutcome::WrongPassword);
        assert_ne!(outcome, LoginOutcome::UnknownUser);
    }

    #[tokio::test]
    async fn test_login_success_mints_verifiable_token() {
        let hash = hash_password("right-password").unwrap();
        let mut store = MockUserStore::new();
        store
            .expect_find_by_username()
            .with(eq("alice"))
            .returning(move |_| Ok(Some(stored_user(7, "alice", &hash))));

        let tokens = issuer();
        let service = AuthService::new(Arc::new(store), tokens.clone());
        let outcome = service.login("alice", "right-password").await.unwrap();

        match outcome {
            LoginOutcome::Success {
                access_token,
                username,
                user_id,
            } => {
                assert_eq!(username, "alice");
                assert_eq!(user_id, 7);
                let claims = tokens.verify(&access_token).unwrap();
                assert_eq!(claims.sub, "alice");
                assert_eq!(claims.user_id, 7);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }
}
