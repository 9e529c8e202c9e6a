use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::db::models::{BudgetCreate, BudgetUpdate};
use crate::error::AppError;
use crate::AppState;

pub async fn list_budgets(
    caller: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let budgets = state.db.list_budgets(caller.user_id).await?;
    Ok(HttpResponse::Ok().json(budgets))
}

pub async fn create_budget(
    caller: AuthenticatedUser,
    req: web::Json<BudgetCreate>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let budget = state.db.create_budget(caller.user_id, &req).await?;
    info!("User {} created budget {}", caller.user_id, budget.budget_id);
    Ok(HttpResponse::Created().json(budget))
}

pub async fn update_budget(
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    req: web::Json<BudgetUpdate>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let budget_id = path.into_inner();
    let budget = state.db.update_budget(caller.user_id, budget_id, &req).await?;
    Ok(HttpResponse::Ok().json(budget))
}

pub async fn delete_budget(
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let budget_id = path.into_inner();
    state.db.delete_budget(caller.user_id, budget_id).await?;
    info!("User {} deleted budget {}", caller.user_id, budget_id);
    Ok(HttpResponse::Ok().json(json!({ "detail": "Budget deleted" })))
}
