//! Booking route handlers
//!
//! Every write that touches a booking's property or dates re-prices it
//! inside the same transaction that persists it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{BookingFilter, BookingResponse, CreateBookingRequest, UpdateBookingRequest};
use crate::pricing;
use crate::AppState;

/// GET /api/bookings
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<BookingFilter>,
) -> Result<Json<Vec<BookingResponse>>> {
    let bookings = db::list_bookings(&state.db, &filter).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// GET /api/bookings/:id
pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>> {
    let booking = db::get_booking(&state.db, id).await?;
    Ok(Json(booking.into()))
}

/// POST /api/bookings
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>)> {
    req.validate(Utc::now().date_naive())?;

    let mut tx = state.db.begin().await?;
    let final_price = pricing::price_stay(&mut tx, req.property, req.date_start, req.date_end).await?;
    let booking = db::insert_booking(&mut *tx, &req, final_price).await?;
    tx.commit().await?;

    tracing::info!(
        booking_id = %booking.id,
        property_id = %booking.property_id,
        %final_price,
        "Booking created"
    );

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// PATCH /api/bookings/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<BookingResponse>> {
    let mut tx = state.db.begin().await?;
    let stored = db::get_booking(&mut *tx, id).await?;
    let change = req.apply(&stored, Utc::now().date_naive())?;

    let final_price = if change.needs_repricing {
        let target = &change.booking;
        let price =
            pricing::price_stay(&mut tx, target.property, target.date_start, target.date_end).await?;
        Some(price)
    } else {
        stored.final_price
    };

    let booking = db::update_booking(&mut *tx, id, &change.booking, final_price).await?;
    tx.commit().await?;

    tracing::info!(
        booking_id = %booking.id,
        repriced = change.needs_repricing,
        "Booking updated"
    );

    Ok(Json(booking.into()))
}

/// DELETE /api/bookings/:id
pub async fn destroy(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    if !db::delete_booking(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Booking {} not found", id)));
    }
    tracing::info!(booking_id = %id, "Booking deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use chrono::{Days, NaiveDate, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use sqlx::PgPool;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::{create_router, AppState};

    fn app(pool: PgPool) -> Router {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://unused".to_string()),
            _ => None,
        })
        .unwrap();
        create_router(AppState::new(pool, config))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn price(body: &Value) -> Decimal {
        body["final_price"].as_str().unwrap().parse().unwrap()
    }

    fn days_from_now(days: u64) -> NaiveDate {
        Utc::now().date_naive().checked_add_days(Days::new(days)).unwrap()
    }

    /// Property at 10 a day with a 10% discount from 7 nights on
    async fn discounted_property(app: &Router) -> Value {
        let (status, property) =
            send(app, "POST", "/api/properties", json!({"name": "Flat", "base_price": "10"})).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(
            app,
            "POST",
            "/api/pricing_rules",
            json!({"property": property["id"], "price_modifier": -10, "min_stay_length": 7}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        property
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn test_create_stores_final_price(pool: PgPool) {
        let app = app(pool);
        let property = discounted_property(&app).await;

        let (status, booking) = send(
            &app,
            "POST",
            "/api/bookings",
            json!({
                "property": property["id"],
                "date_start": days_from_now(30),
                "date_end": days_from_now(39),
                "final_price": "1",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(booking["stay_length"], 10);
        assert_eq!(price(&booking), dec!(90));

        let uri = format!("/api/bookings/{}", booking["id"].as_str().unwrap());
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let stored: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(price(&stored), dec!(90));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn test_extending_booking_recomputes_final_price(pool: PgPool) {
        let app = app(pool);
        let property = discounted_property(&app).await;

        let (_, booking) = send(
            &app,
            "POST",
            "/api/bookings",
            json!({
                "property": property["id"],
                "date_start": days_from_now(30),
                "date_end": days_from_now(39),
            }),
        )
        .await;
        assert_eq!(price(&booking), dec!(90));

        let uri = format!("/api/bookings/{}", booking["id"].as_str().unwrap());
        let (status, updated) =
            send(&app, "PATCH", &uri, json!({"date_end": days_from_now(41)})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["stay_length"], 12);
        assert_eq!(price(&updated), dec!(108));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn test_rule_edits_leave_stored_price_alone(pool: PgPool) {
        let app = app(pool);
        let property = discounted_property(&app).await;

        let (_, booking) = send(
            &app,
            "POST",
            "/api/bookings",
            json!({
                "property": property["id"],
                "date_start": days_from_now(30),
                "date_end": days_from_now(39),
            }),
        )
        .await;

        let property_uri = format!("/api/properties/{}", property["id"].as_str().unwrap());
        let (status, _) = send(&app, "PATCH", &property_uri, json!({"base_price": "20"})).await;
        assert_eq!(status, StatusCode::OK);

        // No date change: the stored price is kept
        let uri = format!("/api/bookings/{}", booking["id"].as_str().unwrap());
        let (_, unchanged) = send(&app, "PATCH", &uri, json!({})).await;
        assert_eq!(price(&unchanged), dec!(90));
    }
}
