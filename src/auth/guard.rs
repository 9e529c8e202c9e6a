//! Request guard for protected routes.
//!
//! Handlers take an [`AuthenticatedUser`] argument; extraction reads
//! the `Authorization: Bearer` header and verifies the token before
//! the handler body runs, so an invalid or absent token never reaches
//! storage. The caller identity carried here is the only source of
//! ownership for every downstream query.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};

use crate::auth::token::TokenIssuer;
use crate::error::{AppError, AuthError};

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
}

impl AuthenticatedUser {
    fn from_http_request(req: &HttpRequest) -> Result<Self, AppError> {
        let issuer = req
            .app_data::<web::Data<TokenIssuer>>()
            .ok_or_else(|| AppError::InternalError("token issuer not configured".into()))?;

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(AuthError::TokenMissing)?;

        let claims = issuer.verify(token)?;

        Ok(Self {
            user_id: claims.user_id,
            username: claims.sub,
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use std::sync::Arc;

    fn issuer() -> Arc<TokenIssuer> {
        Arc::new(TokenIssuer::new(
            "test-secret-key-must-be-at-least-32-chars!".to_string(),
            2,
        ))
    }

    #[actix_web::test]
    async fn test_valid_bearer_token_yields_identity() {
        let issuer = issuer();
        let token = issuer.issue(42, "alice").unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::from(issuer))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let user = AuthenticatedUser::from_http_request(&req).unwrap();
        assert_eq!(user.user_id, 42);
        assert_eq!(user.username, "alice");
    }

    #[actix_web::test]
    async fn test_missing_header_rejected() {
        let req = TestRequest::default()
            .app_data(web::Data::from(issuer()))
            .to_http_request();

        let err = AuthenticatedUser::from_http_request(&req).unwrap_err();
        assert!(matches!(err, AppError::AuthError(AuthError::TokenMissing)));
    }

    #[actix_web::test]
    async fn test_non_bearer_scheme_rejected() {
        let req = TestRequest::default()
            .app_data(web::Data::from(issuer()))
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();

        let err = AuthenticatedUser::from_http_request(&req).unwrap_err();
        assert!(matches!(err, AppError::AuthError(AuthError::TokenMissing)));
    }

    #[actix_web::test]
    async fn test_foreign_signature_rejected() {
        let other = TokenIssuer::new("another-signing-secret-entirely-!!!!".to_string(), 2);
        let token = other.issue(42, "alice").unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::from(issuer()))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let err = AuthenticatedUser::from_http_request(&req).unwrap_err();
        assert!(matches!(
            err,
            AppError::AuthError(AuthError::TokenSignatureInvalid)
        ));
    }
}
