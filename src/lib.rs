//! Shelfmark library lending server
//!
//! Members, a book catalog searchable by title and author substrings through
//! persisted suffix tables, and a lending ledger that never lends one book
//! twice, served as a REST JSON API over Postgres.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod suffix;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let request_timeout = state.config.server.request_timeout();

    let routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Maintenance
        .route("/initialize", post(api::admin::initialize))
        // Members
        .route(
            "/members",
            get(api::members::list_members).post(api::members::register_member),
        )
        .route(
            "/members/:id",
            get(api::members::get_member)
                .patch(api::members::update_member)
                .delete(api::members::ban_member),
        )
        .route("/members/:id/lendings", get(api::members::member_lendings))
        // Books
        .route(
            "/books",
            get(api::books::search_books).post(api::books::register_books),
        )
        .route("/books/:id", get(api::books::get_book))
        // Lendings
        .route(
            "/lendings",
            get(api::lendings::list_lendings).post(api::lendings::lend_books),
        )
        .route("/lendings/return", post(api::lendings::return_books))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api", routes)
        .merge(openapi)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
