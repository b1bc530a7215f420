//! Database queries for properties and bookings

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgExecutor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    Booking, BookingFilter, CreateBookingRequest, CreatePropertyRequest, Property, PropertyFilter,
};

// ==================== properties ====================

/// Find a property by id
pub async fn find_property(executor: impl PgExecutor<'_>, id: Uuid) -> Result<Option<Property>> {
    let property = sqlx::query_as::<_, Property>(
        r#"
        SELECT id, name, base_price, created_at, updated_at
        FROM properties
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(property)
}

/// Get a property by id
pub async fn get_property(executor: impl PgExecutor<'_>, id: Uuid) -> Result<Property> {
    find_property(executor, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Property {} not found", id)))
}

/// Build the filtered property listing query, newest first
pub fn list_properties_query(filter: &PropertyFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "SELECT id, name, base_price, created_at, updated_at FROM properties WHERE TRUE",
    );

    if let Some(name) = &filter.name {
        builder
            .push(" AND name ILIKE ")
            .push_bind(format!("%{}%", escape_like(name)));
    }
    if let Some(min) = filter.base_price_gte {
        builder.push(" AND base_price >= ").push_bind(min);
    }
    if let Some(max) = filter.base_price_lte {
        builder.push(" AND base_price <= ").push_bind(max);
    }

    builder.push(" ORDER BY created_at DESC, id DESC");
    builder
}

/// List properties matching the filter
pub async fn list_properties(
    executor: impl PgExecutor<'_>,
    filter: &PropertyFilter,
) -> Result<Vec<Property>> {
    let properties = list_properties_query(filter)
        .build_query_as::<Property>()
        .fetch_all(executor)
        .await?;

    Ok(properties)
}

/// Insert a new property
pub async fn insert_property(
    executor: impl PgExecutor<'_>,
    input: &CreatePropertyRequest,
) -> Result<Property> {
    let property = sqlx::query_as::<_, Property>(
        r#"
        INSERT INTO properties (id, name, base_price, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING id, name, base_price, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&input.name)
    .bind(input.base_price)
    .bind(Utc::now())
    .fetch_one(executor)
    .await?;

    Ok(property)
}

/// Overwrite the editable columns of a property
pub async fn update_property(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    input: &CreatePropertyRequest,
) -> Result<Property> {
    sqlx::query_as::<_, Property>(
        r#"
        UPDATE properties
        SET name = $2, base_price = $3, updated_at = $4
        WHERE id = $1
        RETURNING id, name, base_price, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(input.base_price)
    .bind(Utc::now())
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Property {} not found", id)))
}

/// Delete a property with its rules and bookings
pub async fn delete_property(executor: impl PgExecutor<'_>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM properties WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

// ==================== bookings ====================

/// Get a booking by id
pub async fn get_booking(executor: impl PgExecutor<'_>, id: Uuid) -> Result<Booking> {
    sqlx::query_as::<_, Booking>(
        r#"
        SELECT id, property_id, date_start, date_end, final_price, created_at, updated_at
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
}

/// Build the filtered booking listing query, newest first
pub fn list_bookings_query(filter: &BookingFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "SELECT id, property_id, date_start, date_end, final_price, created_at, updated_at \
         FROM bookings WHERE TRUE",
    );

    if let Some(property_id) = filter.property {
        builder.push(" AND property_id = ").push_bind(property_id);
    }

    let date_filters = [
        (" AND date_start = ", filter.date_start),
        (" AND date_start >= ", filter.date_start_gte),
        (" AND date_start <= ", filter.date_start_lte),
        (" AND date_end = ", filter.date_end),
        (" AND date_end >= ", filter.date_end_gte),
        (" AND date_end <= ", filter.date_end_lte),
    ];
    for (clause, value) in date_filters {
        if let Some(day) = value {
            builder.push(clause).push_bind(day);
        }
    }

    let price_filters: [(&str, Option<Decimal>); 2] = [
        (" AND final_price >= ", filter.final_price_gte),
        (" AND final_price <= ", filter.final_price_lte),
    ];
    for (clause, value) in price_filters {
        if let Some(price) = value {
            builder.push(clause).push_bind(price);
        }
    }

    builder.push(" ORDER BY created_at DESC, id DESC");
    builder
}

/// List bookings matching the filter
pub async fn list_bookings(
    executor: impl PgExecutor<'_>,
    filter: &BookingFilter,
) -> Result<Vec<Booking>> {
    let bookings = list_bookings_query(filter)
        .build_query_as::<Booking>()
        .fetch_all(executor)
        .await?;

    Ok(bookings)
}

/// Insert a booking with its computed final price
pub async fn insert_booking(
    executor: impl PgExecutor<'_>,
    input: &CreateBookingRequest,
    final_price: Decimal,
) -> Result<Booking> {
    let booking = sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings
            (id, property_id, date_start, date_end, final_price, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING id, property_id, date_start, date_end, final_price, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(input.property)
    .bind(input.date_start)
    .bind(input.date_end)
    .bind(final_price)
    .bind(Utc::now())
    .fetch_one(executor)
    .await?;

    Ok(booking)
}

/// Overwrite a booking's property, dates and final price
pub async fn update_booking(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    input: &CreateBookingRequest,
    final_price: Option<Decimal>,
) -> Result<Booking> {
    sqlx::query_as::<_, Booking>(
        r#"
        UPDATE bookings
        SET property_id = $2,
            date_start = $3,
            date_end = $4,
            final_price = $5,
            updated_at = $6
        WHERE id = $1
        RETURNING id, property_id, date_start, date_end, final_price, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(input.property)
    .bind(input.date_start)
    .bind(input.date_end)
    .bind(final_price)
    .bind(Utc::now())
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
}

/// Delete a booking
pub async fn delete_booking(executor: impl PgExecutor<'_>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Escape LIKE wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
