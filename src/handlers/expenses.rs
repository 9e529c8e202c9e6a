use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::db::models::{ExpenseCreate, ExpenseUpdate};
use crate::error::AppError;
use crate::AppState;

pub async fn list_expenses(
    caller: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let expenses = state.db.list_expenses(caller.user_id).await?;
    Ok(HttpResponse::Ok().json(expenses))
}

pub async fn create_expense(
    caller: AuthenticatedUser,
    req: web::Json<ExpenseCreate>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let expense = state.db.create_expense(caller.user_id, &req).await?;
    info!("User {} created expense {}", caller.user_id, expense.expense_id);
    Ok(HttpResponse::Created().json(expense))
}

pub async fn update_expense(
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    req: web::Json<ExpenseUpdate>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let expense_id = path.into_inner();
    let expense = state
        .db
        .update_expense(caller.user_id, expense_id, &req)
        .await?;
    Ok(HttpResponse::Ok().json(expense))
}

pub async fn delete_expense(
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let expense_id = path.into_inner();
    state.db.delete_expense(caller.user_id, expense_id).await?;
    info!("User {} deleted expense {}", caller.user_id, expense_id);
    Ok(HttpResponse::Ok().json(json!({ "detail": "Expense deleted" })))
}
