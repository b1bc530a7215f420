//! HTTP route handlers

pub mod bookings;
pub mod health;
pub mod properties;

use axum::{routing::get, Router};

use crate::AppState;

/// Property and booking routes, mounted under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/properties", get(properties::list).post(properties::create))
        .route(
            "/properties/:id",
            get(properties::retrieve)
                .patch(properties::update)
                .delete(properties::destroy),
        )
        .route("/bookings", get(bookings::list).post(bookings::create))
        .route(
            "/bookings/:id",
            get(bookings::retrieve)
                .patch(bookings::update)
                .delete(bookings::destroy),
        )
}

/// Liveness and readiness probes
pub fn health_router() -> Router<AppState> {
    Router::new()
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
}
