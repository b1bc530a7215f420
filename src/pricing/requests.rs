//! Request DTOs for pricing API endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::serde_helpers::double_option;

use super::calculators::stay_length;
use super::models::PricingRule;

/// Highest accepted base or fixed price for one day
pub const MAX_PRICE: Decimal = dec!(1_000_000_000);

/// Accepted `price_modifier` range, in percent
pub const MIN_PRICE_MODIFIER: Decimal = dec!(-100);
pub const MAX_PRICE_MODIFIER: Decimal = dec!(1000);

/// Longest stay that can be booked or quoted, in days
pub const MAX_STAY_LENGTH: i64 = 366;

/// Request to create a pricing rule
#[derive(Debug, Deserialize)]
pub struct CreatePricingRuleRequest {
    pub property: Uuid,
    #[serde(default)]
    pub price_modifier: Option<Decimal>,
    #[serde(default)]
    pub min_stay_length: Option<i32>,
    #[serde(default)]
    pub fixed_price: Option<Decimal>,
    #[serde(default)]
    pub specific_day: Option<NaiveDate>,
}

impl CreatePricingRuleRequest {
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        check_specific_day(self.specific_day, today)?;
        check_price_modifier(self.price_modifier)?;
        check_fixed_price(self.fixed_price)?;
        check_min_stay_length(self.min_stay_length)
    }

    pub fn into_input(self) -> PricingRuleInput {
        PricingRuleInput {
            property: self.property,
            price_modifier: self.price_modifier,
            min_stay_length: self.min_stay_length,
            fixed_price: self.fixed_price,
            specific_day: self.specific_day,
        }
    }
}

/// Partial update of a pricing rule.
///
/// Nullable fields accept an explicit `null` to clear the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePricingRuleRequest {
    #[serde(default)]
    pub property: Option<Uuid>,
    #[serde(default, deserialize_with = "double_option")]
    pub price_modifier: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub min_stay_length: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub fixed_price: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub specific_day: Option<Option<NaiveDate>>,
}

impl UpdatePricingRuleRequest {
    /// Validate only the fields present in the payload
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        check_specific_day(self.specific_day.flatten(), today)?;
        check_price_modifier(self.price_modifier.flatten())?;
        check_fixed_price(self.fixed_price.flatten())?;
        check_min_stay_length(self.min_stay_length.flatten())
    }

    /// Merge the payload over the stored rule
    pub fn apply(self, rule: &PricingRule) -> PricingRuleInput {
        PricingRuleInput {
            property: self.property.unwrap_or(rule.property_id),
            price_modifier: self.price_modifier.unwrap_or(rule.price_modifier),
            min_stay_length: self.min_stay_length.unwrap_or(rule.min_stay_length),
            fixed_price: self.fixed_price.unwrap_or(rule.fixed_price),
            specific_day: self.specific_day.unwrap_or(rule.specific_day),
        }
    }
}

/// Validated column values for insert/update
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRuleInput {
    pub property: Uuid,
    pub price_modifier: Option<Decimal>,
    pub min_stay_length: Option<i32>,
    pub fixed_price: Option<Decimal>,
    pub specific_day: Option<NaiveDate>,
}

/// Query parameters for pricing rule listing
#[derive(Debug, Default, Deserialize)]
pub struct PricingRuleFilter {
    pub property: Option<Uuid>,
    pub price_modifier: Option<Decimal>,
    pub min_stay_length: Option<i32>,
    pub fixed_price: Option<Decimal>,
    pub specific_day: Option<NaiveDate>,
    #[serde(rename = "specific_day__gte")]
    pub specific_day_gte: Option<NaiveDate>,
    #[serde(rename = "specific_day__lte")]
    pub specific_day_lte: Option<NaiveDate>,
}

/// Request to price a prospective stay without booking it
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub property: Uuid,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
}

impl QuoteRequest {
    pub fn validate(&self) -> Result<()> {
        check_stay_dates(self.date_start, self.date_end)
    }
}

/// Reject ranges whose end precedes their start or that run longer than
/// [`MAX_STAY_LENGTH`] days
pub fn check_stay_dates(date_start: NaiveDate, date_end: NaiveDate) -> Result<()> {
    if date_start > date_end {
        return Err(AppError::Validation(
            "Booking end date must be after start date.".to_string(),
        ));
    }
    if stay_length(date_start, date_end) > MAX_STAY_LENGTH {
        return Err(AppError::Validation(format!(
            "Stays cannot be longer than {} days.",
            MAX_STAY_LENGTH
        )));
    }
    Ok(())
}

/// Reject negative prices and prices above [`MAX_PRICE`]
pub fn check_price(field: &str, price: Option<Decimal>) -> Result<()> {
    match price {
        Some(price) if price < Decimal::ZERO => Err(AppError::Validation(format!(
            "{} cannot be negative.",
            field
        ))),
        Some(price) if price > MAX_PRICE => Err(AppError::Validation(format!(
            "{} cannot be greater than {}.",
            field, MAX_PRICE
        ))),
        _ => Ok(()),
    }
}

fn check_specific_day(specific_day: Option<NaiveDate>, today: NaiveDate) -> Result<()> {
    match specific_day {
        Some(day) if day < today => Err(AppError::Validation(
            "Specific day must be in the future.".to_string(),
        )),
        _ => Ok(()),
    }
}

fn check_fixed_price(fixed_price: Option<Decimal>) -> Result<()> {
    check_price("Fixed price", fixed_price)
}

fn check_price_modifier(price_modifier: Option<Decimal>) -> Result<()> {
    match price_modifier {
        Some(modifier) if modifier < MIN_PRICE_MODIFIER || modifier > MAX_PRICE_MODIFIER => {
            Err(AppError::Validation(format!(
                "Price modifier must be between {} and {}.",
                MIN_PRICE_MODIFIER, MAX_PRICE_MODIFIER
            )))
        }
        _ => Ok(()),
    }
}

fn check_min_stay_length(min_stay_length: Option<i32>) -> Result<()> {
    match min_stay_length {
        Some(min) if min < 0 => Err(AppError::Validation(
            "Min stay length cannot be negative.".to_string(),
        )),
        _ => Ok(()),
    }
}
