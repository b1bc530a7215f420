//! HTTP routes for pricing rules and stay quotes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::AppState;

use super::queries;
use super::requests::{
    CreatePricingRuleRequest, PricingRuleFilter, QuoteRequest, UpdatePricingRuleRequest,
};
use super::responses::{PricingRuleResponse, QuoteResponse};
use super::services;

/// Pricing router, mounted under `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pricing_rules", get(list).post(create))
        .route(
            "/pricing_rules/:id",
            get(retrieve).patch(update).delete(destroy),
        )
        .route("/pricing/quote", post(quote))
}

/// GET /api/pricing_rules
async fn list(
    State(state): State<AppState>,
    Query(filter): Query<PricingRuleFilter>,
) -> Result<Json<Vec<PricingRuleResponse>>> {
    let rules = queries::list_rules(&state.db, &filter).await?;
    Ok(Json(rules.into_iter().map(Into::into).collect()))
}

/// GET /api/pricing_rules/:id
async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PricingRuleResponse>> {
    let rule = queries::get_rule(&state.db, id).await?;
    Ok(Json(rule.into()))
}

/// POST /api/pricing_rules
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePricingRuleRequest>,
) -> Result<(StatusCode, Json<PricingRuleResponse>)> {
    req.validate(Utc::now().date_naive())?;
    ensure_property_exists(&state, req.property).await?;

    let rule = queries::insert_rule(&state.db, &req.into_input()).await?;
    tracing::info!(rule_id = %rule.id, property_id = %rule.property_id, "Pricing rule created");

    Ok((StatusCode::CREATED, Json(rule.into())))
}

/// PATCH /api/pricing_rules/:id
async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePricingRuleRequest>,
) -> Result<Json<PricingRuleResponse>> {
    req.validate(Utc::now().date_naive())?;
    if let Some(property_id) = req.property {
        ensure_property_exists(&state, property_id).await?;
    }

    let stored = queries::get_rule(&state.db, id).await?;
    let rule = queries::update_rule(&state.db, id, &req.apply(&stored)).await?;
    tracing::info!(rule_id = %rule.id, "Pricing rule updated");

    Ok(Json(rule.into()))
}

/// DELETE /api/pricing_rules/:id
async fn destroy(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    if !queries::delete_rule(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Pricing rule {} not found", id)));
    }
    tracing::info!(rule_id = %id, "Pricing rule deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/pricing/quote
///
/// Prices a prospective stay day by day without persisting anything.
async fn quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    req.validate()?;

    let mut conn = state.db.acquire().await?;
    let breakdown =
        services::quote_stay(&mut conn, req.property, req.date_start, req.date_end).await?;

    Ok(Json(QuoteResponse::new(
        req.property,
        req.date_start,
        req.date_end,
        breakdown,
    )))
}

async fn ensure_property_exists(state: &AppState, property_id: Uuid) -> Result<()> {
    match db::find_property(&state.db, property_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::Validation(format!(
            "Property {} does not exist.",
            property_id
        ))),
    }
}
