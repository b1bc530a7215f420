//! Response DTOs for pricing API endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::calculators::{DayPrice, PriceBreakdown};
use super::models::PricingRule;

/// Pricing rule as returned by the API
#[derive(Debug, Serialize)]
pub struct PricingRuleResponse {
    pub id: Uuid,
    pub property: Uuid,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub price_modifier: Option<Decimal>,
    pub min_stay_length: Option<i32>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub fixed_price: Option<Decimal>,
    pub specific_day: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PricingRule> for PricingRuleResponse {
    fn from(rule: PricingRule) -> Self {
        Self {
            id: rule.id,
            property: rule.property_id,
            price_modifier: rule.price_modifier,
            min_stay_length: rule.min_stay_length,
            fixed_price: rule.fixed_price,
            specific_day: rule.specific_day,
            created_at: rule.created_at,
            updated_at: rule.updated_at,
        }
    }
}

/// One resolved day in a quote
#[derive(Debug, Serialize)]
pub struct DayPriceResponse {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub rule_id: Option<Uuid>,
}

impl From<DayPrice> for DayPriceResponse {
    fn from(day: DayPrice) -> Self {
        Self {
            date: day.date,
            price: day.price,
            rule_id: day.rule_id,
        }
    }
}

/// Response for a stay quote
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub property: Uuid,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub stay_length: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_price: Decimal,
    pub days: Vec<DayPriceResponse>,
}

impl QuoteResponse {
    pub fn new(
        property: Uuid,
        date_start: NaiveDate,
        date_end: NaiveDate,
        breakdown: PriceBreakdown,
    ) -> Self {
        Self {
            property,
            date_start,
            date_end,
            stay_length: breakdown.stay_length,
            base_price: breakdown.base_price,
            final_price: breakdown.final_price,
            days: breakdown.days.into_iter().map(Into::into).collect(),
        }
    }
}
