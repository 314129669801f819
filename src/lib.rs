pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{jwt_auth_middleware, JwtService};
use crate::config::Settings;
use crate::handlers::{
    create_alert_routes, create_analytics_routes, create_conversion_routes, create_rate_routes,
    health_check,
};
use crate::services::QuoteProvider;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Settings,
    pub jwt_service: Arc<JwtService>,
    pub quote_provider: Arc<dyn QuoteProvider>,
}

/// Builds the full application router. Rate mutation, alert and
/// conversion routes require a bearer token; analytics reads and health
/// stay open.
pub fn build_router(state: AppState) -> Router {
    let protected = create_rate_routes()
        .merge(create_alert_routes())
        .merge(create_conversion_routes())
        .layer(middleware::from_fn_with_state(
            state.jwt_service.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1/currency", protected.merge(create_analytics_routes()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
