//! Pricing service functions with database access.
//!
//! These functions load a property's base price and rule snapshot and hand
//! them to the pure calculators.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::db;
use crate::error::Result;

use super::calculators::{resolve, resolve_breakdown, PriceBreakdown};
use super::models::PricingRule;
use super::queries;

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq)]
pub enum PricingError {
    PropertyNotFound { property_id: Uuid },
    MissingBasePrice { property_id: Uuid },
    PriceOverflow { property_id: Uuid },
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::PropertyNotFound { property_id } => {
                write!(f, "Property {} not found", property_id)
            }
            PricingError::MissingBasePrice { property_id } => {
                write!(f, "Property {} has no base price", property_id)
            }
            PricingError::PriceOverflow { property_id } => {
                write!(f, "Price of this stay at property {} is out of range", property_id)
            }
        }
    }
}

impl std::error::Error for PricingError {}

/// Base price and ordered rule snapshot of a property.
async fn load_pricing(
    conn: &mut PgConnection,
    property_id: Uuid,
) -> Result<(Decimal, Vec<PricingRule>)> {
    let property = db::find_property(&mut *conn, property_id)
        .await?
        .ok_or(PricingError::PropertyNotFound { property_id })?;

    let base_price = property
        .base_price
        .ok_or(PricingError::MissingBasePrice { property_id })?;

    let rules = queries::rules_for_property(&mut *conn, property_id).await?;
    Ok((base_price, rules))
}

/// Final price of a stay at a property.
///
/// Reads the property and its full rule set through the same connection,
/// so inside a transaction the result matches the snapshot that gets
/// persisted. Nothing is written here.
///
/// # Arguments
/// * `conn` - Connection (or transaction) to read from
/// * `property_id` - Property being booked
/// * `date_start` - First day of the stay
/// * `date_end` - Last day of the stay (inclusive)
pub async fn price_stay(
    conn: &mut PgConnection,
    property_id: Uuid,
    date_start: NaiveDate,
    date_end: NaiveDate,
) -> Result<Decimal> {
    let (base_price, rules) = load_pricing(conn, property_id).await?;
    let final_price = resolve(base_price, date_start, date_end, &rules)
        .ok_or(PricingError::PriceOverflow { property_id })?;

    tracing::debug!(
        %property_id,
        %date_start,
        %date_end,
        rules = rules.len(),
        %final_price,
        "Resolved stay price"
    );

    Ok(final_price)
}

/// Day-by-day price of a stay at a property, for quotes.
pub async fn quote_stay(
    conn: &mut PgConnection,
    property_id: Uuid,
    date_start: NaiveDate,
    date_end: NaiveDate,
) -> Result<PriceBreakdown> {
    let (base_price, rules) = load_pricing(conn, property_id).await?;
    let breakdown = resolve_breakdown(base_price, date_start, date_end, &rules)
        .ok_or(PricingError::PriceOverflow { property_id })?;

    tracing::debug!(
        %property_id,
        stay_length = breakdown.stay_length,
        final_price = %breakdown.final_price,
        "Quoted stay"
    );

    Ok(breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::PropertyNotFound {
            property_id: Uuid::nil(),
        };
        assert!(err.to_string().contains("not found"));

        let err = PricingError::MissingBasePrice {
            property_id: Uuid::nil(),
        };
        assert!(err.to_string().contains("no base price"));

        let err = PricingError::PriceOverflow {
            property_id: Uuid::nil(),
        };
        assert!(err.to_string().contains("out of range"));
    }
}
