//! Booking models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::pricing::calculators;
use crate::pricing::requests::check_stay_dates;

/// Booking from database
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub property_id: Uuid,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub final_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Inclusive number of days booked
    pub fn stay_length(&self) -> i64 {
        calculators::stay_length(self.date_start, self.date_end)
    }
}

/// Booking as returned by the API
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub property: Uuid,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub stay_length: i64,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub final_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            stay_length: booking.stay_length(),
            id: booking.id,
            property: booking.property_id,
            date_start: booking.date_start,
            date_end: booking.date_end,
            final_price: booking.final_price,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// Request to create a booking.
///
/// `final_price` is derived server-side; any value sent is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub property: Uuid,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
}

impl CreateBookingRequest {
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        check_start_not_past(self.date_start, today)?;
        check_stay_dates(self.date_start, self.date_end)
    }
}

/// Partial update of a booking
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookingRequest {
    #[serde(default)]
    pub property: Option<Uuid>,
    #[serde(default)]
    pub date_start: Option<NaiveDate>,
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
}

impl UpdateBookingRequest {
    /// Merge the payload over the stored booking and validate the result.
    ///
    /// Only a newly supplied start date has to be in the future; the date
    /// order is checked on the merged range.
    pub fn apply(self, booking: &Booking, today: NaiveDate) -> Result<BookingChange> {
        if let Some(date_start) = self.date_start {
            check_start_not_past(date_start, today)?;
        }

        let merged = CreateBookingRequest {
            property: self.property.unwrap_or(booking.property_id),
            date_start: self.date_start.unwrap_or(booking.date_start),
            date_end: self.date_end.unwrap_or(booking.date_end),
        };
        check_stay_dates(merged.date_start, merged.date_end)?;

        let needs_repricing = merged.property != booking.property_id
            || merged.date_start != booking.date_start
            || merged.date_end != booking.date_end
            || booking.final_price.is_none();

        Ok(BookingChange {
            booking: merged,
            needs_repricing,
        })
    }
}

/// Result of merging a booking update
#[derive(Debug, Clone)]
pub struct BookingChange {
    pub booking: CreateBookingRequest,
    /// Property or dates changed, so `final_price` must be recomputed
    pub needs_repricing: bool,
}

/// Query parameters for booking listing
#[derive(Debug, Default, Deserialize)]
pub struct BookingFilter {
    pub property: Option<Uuid>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    #[serde(rename = "date_start__gte")]
    pub date_start_gte: Option<NaiveDate>,
    #[serde(rename = "date_start__lte")]
    pub date_start_lte: Option<NaiveDate>,
    #[serde(rename = "date_end__gte")]
    pub date_end_gte: Option<NaiveDate>,
    #[serde(rename = "date_end__lte")]
    pub date_end_lte: Option<NaiveDate>,
    #[serde(rename = "final_price__gte")]
    pub final_price_gte: Option<Decimal>,
    #[serde(rename = "final_price__lte")]
    pub final_price_lte: Option<Decimal>,
}

fn check_start_not_past(date_start: NaiveDate, today: NaiveDate) -> Result<()> {
    if date_start < today {
        return Err(AppError::Validation(
            "Booking start date must be in the future.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::fixtures::duration_rule;
    use crate::pricing::PricingRule;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stored() -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            date_start: date(2022, 1, 1),
            date_end: date(2022, 1, 10),
            final_price: Some(dec!(90)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_stay_length_is_inclusive() {
        assert_eq!(stored().stay_length(), 10);
    }

    #[test]
    fn test_create_rejects_past_start() {
        let req = CreateBookingRequest {
            property: Uuid::nil(),
            date_start: date(2021, 12, 31),
            date_end: date(2022, 1, 5),
        };
        let err = req.validate(date(2022, 1, 1)).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("future")));
    }

    #[test]
    fn test_create_rejects_end_before_start() {
        let req = CreateBookingRequest {
            property: Uuid::nil(),
            date_start: date(2022, 1, 5),
            date_end: date(2022, 1, 4),
        };
        let err = req.validate(date(2022, 1, 1)).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("after start")));
    }

    #[test]
    fn test_create_accepts_single_day() {
        let req = CreateBookingRequest {
            property: Uuid::nil(),
            date_start: date(2022, 1, 4),
            date_end: date(2022, 1, 4),
        };
        assert!(req.validate(date(2022, 1, 1)).is_ok());
    }

    #[test]
    fn test_create_ignores_final_price_in_payload() {
        let req: CreateBookingRequest = serde_json::from_str(
            r#"{"property": "00000000-0000-0000-0000-000000000000",
                "date_start": "2022-01-01", "date_end": "2022-01-10", "final_price": 1}"#,
        )
        .unwrap();
        assert_eq!(req.date_end, date(2022, 1, 10));
    }

    #[test]
    fn test_update_extending_stay_requires_repricing() {
        let booking = stored();
        let patch = UpdateBookingRequest {
            date_end: Some(date(2022, 1, 12)),
            ..Default::default()
        };
        // Existing start date is already in the past; only new values are checked.
        let change = patch.apply(&booking, date(2022, 1, 5)).unwrap();
        assert!(change.needs_repricing);
        assert_eq!(change.booking.date_start, date(2022, 1, 1));
        assert_eq!(change.booking.date_end, date(2022, 1, 12));
        assert_eq!(change.booking.property, booking.property_id);
    }

    #[test]
    fn test_update_without_changes_keeps_price() {
        let booking = stored();
        let change = UpdateBookingRequest::default()
            .apply(&booking, date(2022, 1, 1))
            .unwrap();
        assert!(!change.needs_repricing);
    }

    #[test]
    fn test_update_rejects_merged_inverted_range() {
        let patch = UpdateBookingRequest {
            date_end: Some(date(2021, 12, 25)),
            ..Default::default()
        };
        assert!(patch.apply(&stored(), date(2021, 12, 1)).is_err());
    }

    #[test]
    fn test_update_rejects_new_past_start() {
        let patch = UpdateBookingRequest {
            date_start: Some(date(2022, 1, 2)),
            ..Default::default()
        };
        assert!(patch.apply(&stored(), date(2022, 1, 3)).is_err());
    }

    #[test]
    fn test_create_rejects_overlong_stay() {
        let req = CreateBookingRequest {
            property: Uuid::nil(),
            date_start: date(2030, 1, 1),
            date_end: date(9999, 12, 31),
        };
        let err = req.validate(date(2022, 1, 1)).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("longer than")));
    }

    #[test]
    fn test_update_rejects_overlong_merged_stay() {
        let patch = UpdateBookingRequest {
            date_end: Some(date(2023, 6, 1)),
            ..Default::default()
        };
        assert!(patch.apply(&stored(), date(2022, 1, 1)).is_err());
    }

    #[test]
    fn test_extended_booking_is_repriced_with_current_rules() {
        let rules = [PricingRule {
            price_modifier: Some(dec!(-10)),
            ..duration_rule(7)
        }];
        let booking = stored();
        let price = |req: &CreateBookingRequest| {
            calculators::resolve(dec!(10), req.date_start, req.date_end, &rules).unwrap()
        };

        let created = CreateBookingRequest {
            property: booking.property_id,
            date_start: booking.date_start,
            date_end: booking.date_end,
        };
        assert_eq!(price(&created), dec!(90));

        let patch = UpdateBookingRequest {
            date_end: Some(date(2022, 1, 12)),
            ..Default::default()
        };
        let change = patch.apply(&booking, date(2022, 1, 1)).unwrap();
        assert!(change.needs_repricing);
        assert_eq!(price(&change.booking), dec!(108));
    }

    #[test]
    fn test_filter_parses_range_suffixes() {
        let filter: BookingFilter =
            serde_json::from_str(r#"{"date_start__gte": "2022-01-01", "final_price__lte": 100}"#)
                .unwrap();
        assert_eq!(filter.date_start_gte, Some(date(2022, 1, 1)));
        assert_eq!(filter.final_price_lte, Some(dec!(100)));
    }
}
