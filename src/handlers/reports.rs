use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::AppState;

pub async fn spending_by_category(
    caller: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let rows = state.db.spending_by_category(caller.user_id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn total_spent(
    caller: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let total = state.db.total_spent(caller.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "username": caller.username,
        "total_spent": total,
    })))
}

pub async fn monthly_spending(
    caller: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let rows = state.db.monthly_spending(caller.user_id).await?;
    Ok(HttpResponse::Ok().json(rows))
}
