use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::auth::service::LoginOutcome;
use crate::db::models::NewUser;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn register(
    req: web::Json<NewUser>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for username: {}", req.user_name);
    let user = state.auth_service.register(&req).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Login returns its three outcomes as data with a 200 status; only
/// transport-level problems become error responses.
pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for username: {}", req.username);
    let outcome = state.auth_service.login(&req.username, &req.password).await?;

    let body = match outcome {
        LoginOutcome::UnknownUser => json!({
            "status": "error",
            "message": "User does not exist",
        }),
        LoginOutcome::WrongPassword => json!({
            "status": "error",
            "message": "Invalid password",
        }),
        LoginOutcome::Success {
            access_token,
            username,
            user_id,
        } => json!({
            "status": "success",
            "message": "Login successful",
            "access_token": access_token,
            "token_type": "bearer",
            "username": username,
            "user_id": user_id,
        }),
    };

    Ok(HttpResponse::Ok().json(body))
}
