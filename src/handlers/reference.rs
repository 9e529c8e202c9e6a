//! Global reference data: categories and payment methods are shared
//! across all accounts and carry no ownership.

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::AppError;
use crate::AppState;

pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let categories = state.db.list_categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

pub async fn list_payment_methods(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let methods = state.db.list_payment_methods().await?;
    Ok(HttpResponse::Ok().json(methods))
}

pub async fn seed_data(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.db.seed_defaults().await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Default data seeded successfully"
    })))
}
