//! Password hashing and verification built on Argon2id.
//!
//! Hashes are stored as PHC strings, so algorithm, cost parameters and
//! salt travel with the hash and the scheme can be upgraded without a
//! global migration.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AuthError;

/// Upper bound on accepted plaintext length, checked before the costly
/// hash computation.
pub const MAX_PASSWORD_LENGTH: usize = 72;

/// Hash a plaintext password with a fresh random salt.
///
/// Two calls with the same plaintext produce different strings; both
/// verify against the original password.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashingFailed(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Verify a plaintext candidate against a stored hash.
///
/// Fails closed: a malformed, truncated or foreign-algorithm stored
/// hash yields `false`, never an error or a panic.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(stored_hash) {
        Ok(hash) => hash,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("incorrect horse", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("hunter2!").unwrap();
        let second = hash_password("hunter2!").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("hunter2!", &first));
        assert!(verify_password("hunter2!", &second));
    }

    #[test]
    fn test_hash_is_self_describing() {
        let hash = hash_password("some password").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_fails_closed_on_malformed_hash() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "not-a-hash"));
        assert!(!verify_password("anything", "$argon2id$truncated"));
        // bcrypt-style modular crypt string is not a valid PHC string
        assert!(!verify_password(
            "anything",
            "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW"
        ));
    }
}
