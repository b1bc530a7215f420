//! Database models for pricing queries.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// PricingRule from pricing_rules
///
/// A rule combines an optional condition (`min_stay_length` and/or
/// `specific_day`) with an optional effect (`fixed_price` and/or
/// `price_modifier`). A rule with no condition never applies.
#[derive(Debug, Clone, FromRow)]
pub struct PricingRule {
    pub id: Uuid,
    pub property_id: Uuid,
    /// Signed percentage, -10 means a 10% discount
    pub price_modifier: Option<Decimal>,
    pub min_stay_length: Option<i32>,
    pub fixed_price: Option<Decimal>,
    pub specific_day: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingRule {
    /// Check if the duration condition holds for a stay of `stay_length` days
    pub fn matches_stay_length(&self, stay_length: i64) -> bool {
        match self.min_stay_length {
            Some(min) => stay_length >= i64::from(min),
            None => false,
        }
    }

    /// Check if the rule targets exactly `day`
    pub fn matches_day(&self, day: NaiveDate) -> bool {
        self.specific_day == Some(day)
    }

    /// Check if the rule governs `day` within a stay of `stay_length` days
    pub fn applies_on(&self, day: NaiveDate, stay_length: i64) -> bool {
        self.matches_stay_length(stay_length) || self.matches_day(day)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_matches_stay_length_inclusive_threshold() {
        let r = duration_rule(7);
        assert!(!r.matches_stay_length(6));
        assert!(r.matches_stay_length(7));
        assert!(r.matches_stay_length(30));
    }

    #[test]
    fn test_rule_without_conditions_never_applies() {
        let r = rule();
        assert!(!r.applies_on(date(2022, 1, 4), 365));
    }

    #[test]
    fn test_day_rule_applies_only_on_its_day() {
        let r = day_rule(date(2022, 1, 4));
        assert!(r.applies_on(date(2022, 1, 4), 1));
        assert!(!r.applies_on(date(2022, 1, 5), 10));
    }
}
