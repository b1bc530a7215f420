//! Booking service with per-day pricing rule resolution.
//!
//! Properties carry a base price and a set of pricing rules; every booking
//! is priced day by day, each day governed by its single most relevant rule.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pricing;
pub mod routes;

use axum::Router;
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self { db, config }
    }
}

/// Build the application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let api = routes::api_router().merge(pricing::router());

    Router::new()
        .nest("/api", api)
        .nest("/health", routes::health_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
