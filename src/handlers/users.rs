use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::db::UserStore;
use crate::error::{AppError, DatabaseError};
use crate::AppState;

pub async fn me(
    caller: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    // A valid token can outlive its account (deletion is immediate,
    // tokens are stateless), so the row may legitimately be gone.
    let user = state
        .db
        .find_by_id(caller.user_id)
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;

    Ok(HttpResponse::Ok().json(user.public()))
}

/// Deletes the caller's account and everything it owns. The target is
/// always the authenticated identity; there is no path or body
/// parameter to delete someone else.
pub async fn delete_me(
    caller: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.db.delete_user_cascade(caller.user_id).await?;
    info!("Deleted account {} and all owned records", caller.user_id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "User and related data deleted successfully"
    })))
}
