//! Property route handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{CreatePropertyRequest, PropertyFilter, PropertyResponse, UpdatePropertyRequest};
use crate::AppState;

/// GET /api/properties
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<PropertyFilter>,
) -> Result<Json<Vec<PropertyResponse>>> {
    let properties = db::list_properties(&state.db, &filter).await?;
    Ok(Json(properties.into_iter().map(Into::into).collect()))
}

/// GET /api/properties/:id
pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PropertyResponse>> {
    let property = db::get_property(&state.db, id).await?;
    Ok(Json(property.into()))
}

/// POST /api/properties
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<PropertyResponse>)> {
    req.validate()?;
    let property = db::insert_property(&state.db, &req).await?;
    tracing::info!(property_id = %property.id, "Property created");
    Ok((StatusCode::CREATED, Json(property.into())))
}

/// PATCH /api/properties/:id
///
/// Changing the base price does not re-price existing bookings.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePropertyRequest>,
) -> Result<Json<PropertyResponse>> {
    req.validate()?;
    let stored = db::get_property(&state.db, id).await?;
    let property = db::update_property(&state.db, id, &req.apply(&stored)).await?;
    tracing::info!(property_id = %property.id, "Property updated");
    Ok(Json(property.into()))
}

/// DELETE /api/properties/:id
pub async fn destroy(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    if !db::delete_property(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Property {} not found", id)));
    }
    tracing::info!(property_id = %id, "Property deleted");
    Ok(StatusCode::NO_CONTENT)
}
