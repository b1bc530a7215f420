//! Database queries for pricing rules.

use chrono::Utc;
use sqlx::{PgExecutor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, Result};

use super::models::PricingRule;
use super::requests::{PricingRuleFilter, PricingRuleInput};

/// Snapshot of every rule belonging to a property.
///
/// Ordered by creation so rule selection ties resolve the same way on
/// every call.
pub async fn rules_for_property(
    executor: impl PgExecutor<'_>,
    property_id: Uuid,
) -> Result<Vec<PricingRule>> {
    let rules = sqlx::query_as::<_, PricingRule>(
        r#"
        SELECT
            id, property_id, price_modifier, min_stay_length,
            fixed_price, specific_day, created_at, updated_at
        FROM pricing_rules
        WHERE property_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(property_id)
    .fetch_all(executor)
    .await?;

    Ok(rules)
}

/// Build the filtered listing query, newest first
pub fn list_rules_query(filter: &PricingRuleFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "SELECT id, property_id, price_modifier, min_stay_length, \
         fixed_price, specific_day, created_at, updated_at \
         FROM pricing_rules WHERE TRUE",
    );

    if let Some(property_id) = filter.property {
        builder.push(" AND property_id = ").push_bind(property_id);
    }
    if let Some(modifier) = filter.price_modifier {
        builder.push(" AND price_modifier = ").push_bind(modifier);
    }
    if let Some(min_stay) = filter.min_stay_length {
        builder.push(" AND min_stay_length = ").push_bind(min_stay);
    }
    if let Some(fixed) = filter.fixed_price {
        builder.push(" AND fixed_price = ").push_bind(fixed);
    }
    if let Some(day) = filter.specific_day {
        builder.push(" AND specific_day = ").push_bind(day);
    }
    if let Some(day) = filter.specific_day_gte {
        builder.push(" AND specific_day >= ").push_bind(day);
    }
    if let Some(day) = filter.specific_day_lte {
        builder.push(" AND specific_day <= ").push_bind(day);
    }

    builder.push(" ORDER BY created_at DESC, id DESC");
    builder
}

/// List rules matching the filter
pub async fn list_rules(
    executor: impl PgExecutor<'_>,
    filter: &PricingRuleFilter,
) -> Result<Vec<PricingRule>> {
    let rules = list_rules_query(filter)
        .build_query_as::<PricingRule>()
        .fetch_all(executor)
        .await?;

    Ok(rules)
}

/// Get a pricing rule by id
pub async fn get_rule(executor: impl PgExecutor<'_>, id: Uuid) -> Result<PricingRule> {
    sqlx::query_as::<_, PricingRule>(
        r#"
        SELECT
            id, property_id, price_modifier, min_stay_length,
            fixed_price, specific_day, created_at, updated_at
        FROM pricing_rules
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Pricing rule {} not found", id)))
}

/// Insert a new pricing rule
pub async fn insert_rule(
    executor: impl PgExecutor<'_>,
    input: &PricingRuleInput,
) -> Result<PricingRule> {
    let now = Utc::now();
    let rule = sqlx::query_as::<_, PricingRule>(
        r#"
        INSERT INTO pricing_rules
            (id, property_id, price_modifier, min_stay_length,
             fixed_price, specific_day, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING
            id, property_id, price_modifier, min_stay_length,
            fixed_price, specific_day, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(input.property)
    .bind(input.price_modifier)
    .bind(input.min_stay_length)
    .bind(input.fixed_price)
    .bind(input.specific_day)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(rule)
}

/// Overwrite every editable column of a rule
pub async fn update_rule(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    input: &PricingRuleInput,
) -> Result<PricingRule> {
    sqlx::query_as::<_, PricingRule>(
        r#"
        UPDATE pricing_rules
        SET property_id = $2,
            price_modifier = $3,
            min_stay_length = $4,
            fixed_price = $5,
            specific_day = $6,
            updated_at = $7
        WHERE id = $1
        RETURNING
            id, property_id, price_modifier, min_stay_length,
            fixed_price, specific_day, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(input.property)
    .bind(input.price_modifier)
    .bind(input.min_stay_length)
    .bind(input.fixed_price)
    .bind(input.specific_day)
    .bind(Utc::now())
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Pricing rule {} not found", id)))
}

/// Delete a pricing rule, reporting whether a row was removed
pub async fn delete_rule(executor: impl PgExecutor<'_>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM pricing_rules WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
