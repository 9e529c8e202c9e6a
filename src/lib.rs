pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use actix_web::HttpResponse;

pub use config::Settings;
pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;

pub use auth::{AuthService, TokenIssuer};
pub use db::{DbOperations, UserStore};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all components. The signing secret
/// and database credentials arrive through [`Settings`]; nothing here
/// is a process-wide mutable global.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db: Arc<DbOperations>,
    pub auth_service: Arc<AuthService>,
    pub token_issuer: Arc<TokenIssuer>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let db = Arc::new(
            DbOperations::new_with_options(
                &config.database.url,
                config.database.max_connections,
                Duration::from_secs(5),
            )
            .await?,
        );

        Ok(Self::with_db(config, db))
    }

    /// Assembles the state around an already-connected data layer.
    /// Used directly by the integration tests.
    pub fn with_db(config: Settings, db: Arc<DbOperations>) -> Self {
        let token_issuer = Arc::new(TokenIssuer::new(
            config.auth.jwt_secret.clone(),
            config.auth.token_expiry_hours,
        ));
        let auth_service = Arc::new(AuthService::new(
            db.clone() as Arc<dyn UserStore>,
            token_issuer.clone(),
        ));

        Self {
            config: Arc::new(config),
            db,
            auth_service,
            token_issuer,
        }
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.db.pool().close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_health_check_response() {
        let resp = health_check().await;
        assert!(resp.status().is_success());

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert!(chrono::DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());
    }
}
