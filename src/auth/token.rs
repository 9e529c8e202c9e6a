//! Stateless bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the subject's username and account
//! id plus absolute issue/expiry timestamps. Nothing is persisted at
//! issuance; verification is signature plus expiry, so logout is a
//! client-side discard and expiry forces a fresh login.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AuthError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject username
    pub sub: String,
    /// Subject account id
    pub user_id: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

pub struct TokenIssuer {
    jwt_secret: String,
    expiry_hours: i64,
}

impl TokenIssuer {
    pub fn new(jwt_secret: String, expiry_hours: i64) -> Self {
        Self {
            jwt_secret,
            expiry_hours,
        }
    }

    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            user_id,
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::InternalError(format!("token encoding failed: {}", e)))
    }

    /// Validates signature and expiry. The three failure modes stay
    /// distinct so callers can tell "log in again" from "tampered
    /// token" from "not a token at all".
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature => AuthError::TokenSignatureInvalid,
            _ => AuthError::TokenMalformed,
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "test-secret-key-must-be-at-least-32-chars!";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET.to_string(), 2)
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let issuer = issuer();
        let token = issuer.issue(42, "alice").unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.user_id, 42);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer();
        let now = Utc::now();
        // Hand-craft a token whose expiry is three hours in the past,
        // well beyond the validator's leeway.
        let claims = Claims {
            sub: "alice".to_string(),
            user_id: 42,
            exp: (now - Duration::hours(3)).timestamp(),
            iat: (now - Duration::hours(5)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(issuer.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let issuer = issuer();
        let other = TokenIssuer::new("a-completely-different-signing-secret!!".to_string(), 2);
        let token = other.issue(42, "alice").unwrap();

        // Signature mismatch must be distinct from expiry.
        assert!(matches!(
            issuer.verify(&token),
            Err(AuthError::TokenSignatureInvalid)
        ));
    }

    #[test]
    fn test_garbage_token_rejected_as_malformed() {
        let issuer = issuer();
        assert!(matches!(
            issuer.verify("not.a.token"),
            Err(AuthError::TokenMalformed)
        ));
        assert!(matches!(issuer.verify(""), Err(AuthError::TokenMalformed)));
    }

    #[test]
    fn test_missing_claims_rejected_as_malformed() {
        let issuer = issuer();
        let now = Utc::now();
        // No user_id claim.
        let payload = json!({
            "sub": "alice",
            "exp": (now + Duration::hours(2)).timestamp(),
            "iat": now.timestamp(),
        });
        let token = encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            issuer.verify(&token),
            Err(AuthError::TokenMalformed)
        ));
    }
}
