use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use expense_tracker_server::auth::handlers::{login, register};
use expense_tracker_server::handlers::{budgets, expenses, reference, reports, users};
use expense_tracker_server::{health_check, AppError, AppState, Settings};
use std::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[actix_web::main]
async fn main() -> expense_tracker_server::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();

    // Load configuration
    let config = Settings::new()?;
    info!("Configuration loaded successfully");

    info!("Starting server at {}:{}", config.server.host, config.server.port);

    // Initialize application state
    let state = AppState::new(config.clone()).await?;
    let token_issuer = web::Data::from(state.token_issuer.clone());
    let state = web::Data::new(state);

    // Create and bind TCP listener
    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;

    // Start HTTP server
    let cors_settings = config.cors.clone();
    HttpServer::new(move || {
        let cors = if cors_settings.enabled {
            let cors_config = Cors::default();

            let cors_config = if cors_settings.allow_any_origin {
                cors_config
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
            } else {
                cors_config
                    .allowed_origin("http://localhost:8501")
                    .allowed_origin("http://127.0.0.1:8501")
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
                    .allowed_headers(vec!["Authorization", "Content-Type"])
                    .supports_credentials()
            };

            cors_config.max_age(cors_settings.max_age as usize)
        } else {
            Cors::default()
        };

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(token_issuer.clone())
            .route("/health", web::get().to(health_check))
            .route("/auth/register", web::post().to(register))
            .route("/auth/login", web::post().to(login))
            .route("/me", web::get().to(users::me))
            .route("/users/me", web::delete().to(users::delete_me))
            .route("/expenses", web::get().to(expenses::list_expenses))
            .route("/expenses", web::post().to(expenses::create_expense))
            .route("/expenses/{id}", web::put().to(expenses::update_expense))
            .route("/expenses/{id}", web::delete().to(expenses::delete_expense))
            .route("/budgets", web::get().to(budgets::list_budgets))
            .route("/budgets", web::post().to(budgets::create_budget))
            .route("/budgets/{id}", web::put().to(budgets::update_budget))
            .route("/budgets/{id}", web::delete().to(budgets::delete_budget))
            .route(
                "/reports/spending-by-category",
                web::get().to(reports::spending_by_category),
            )
            .route("/reports/total-spent", web::get().to(reports::total_spent))
            .route(
                "/reports/monthly-spending",
                web::get().to(reports::monthly_spending),
            )
            .route("/categories", web::get().to(reference::list_categories))
            .route(
                "/payment-methods",
                web::get().to(reference::list_payment_methods),
            )
            .route("/seed-data", web::post().to(reference::seed_data))
    })
    .listen(listener)?
    .workers(config.server.workers as usize)
    .run()
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(())
}
