//! Property models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::Result;
use crate::pricing::requests::check_price;

use super::serde_helpers::double_option;

/// Property from database
///
/// A house, a flat, a hotel room: anything bookable by the day.
#[derive(Debug, Clone, FromRow)]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub base_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Property as returned by the API
#[derive(Debug, Serialize)]
pub struct PropertyResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub base_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Property> for PropertyResponse {
    fn from(property: Property) -> Self {
        Self {
            id: property.id,
            name: property.name,
            base_price: property.base_price,
            created_at: property.created_at,
            updated_at: property.updated_at,
        }
    }
}

/// Request to create a property
#[derive(Debug, Deserialize)]
pub struct CreatePropertyRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_price: Option<Decimal>,
}

impl CreatePropertyRequest {
    pub fn validate(&self) -> Result<()> {
        check_base_price(self.base_price)
    }
}

/// Partial update of a property
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePropertyRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub base_price: Option<Option<Decimal>>,
}

impl UpdatePropertyRequest {
    pub fn validate(&self) -> Result<()> {
        check_base_price(self.base_price.flatten())
    }

    /// Merge the payload over the stored property
    pub fn apply(self, property: &Property) -> CreatePropertyRequest {
        CreatePropertyRequest {
            name: self.name.unwrap_or_else(|| property.name.clone()),
            base_price: self.base_price.unwrap_or(property.base_price),
        }
    }
}

/// Query parameters for property listing
#[derive(Debug, Default, Deserialize)]
pub struct PropertyFilter {
    /// Case-insensitive substring match
    pub name: Option<String>,
    #[serde(rename = "base_price__gte")]
    pub base_price_gte: Option<Decimal>,
    #[serde(rename = "base_price__lte")]
    pub base_price_lte: Option<Decimal>,
}

fn check_base_price(base_price: Option<Decimal>) -> Result<()> {
    check_price("Base price", base_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use rust_decimal_macros::dec;

    fn stored() -> Property {
        let now = Utc::now();
        Property {
            id: Uuid::new_v4(),
            name: "Big house in front of the beach".to_string(),
            base_price: Some(dec!(10)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_create_rejects_negative_base_price() {
        let req: CreatePropertyRequest =
            serde_json::from_str(r#"{"name": "Flat", "base_price": -5}"#).unwrap();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_create_rejects_base_price_above_limit() {
        let req: CreatePropertyRequest =
            serde_json::from_str(r#"{"base_price": "79228162514264337593543950335"}"#).unwrap();
        let err = req.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("greater than")));

        let req: CreatePropertyRequest =
            serde_json::from_str(r#"{"base_price": 1000000000}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_rejects_base_price_above_limit() {
        let patch: UpdatePropertyRequest =
            serde_json::from_str(r#"{"base_price": "1000000001"}"#).unwrap();
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_create_defaults() {
        let req: CreatePropertyRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.name, "");
        assert!(req.base_price.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_keeps_unset_fields() {
        let patch: UpdatePropertyRequest =
            serde_json::from_str(r#"{"base_price": "12.50"}"#).unwrap();
        assert!(patch.validate().is_ok());

        let merged = patch.apply(&stored());
        assert_eq!(merged.name, "Big house in front of the beach");
        assert_eq!(merged.base_price, Some(dec!(12.50)));
    }

    #[test]
    fn test_update_can_clear_base_price() {
        let patch: UpdatePropertyRequest = serde_json::from_str(r#"{"base_price": null}"#).unwrap();
        assert_eq!(patch.apply(&stored()).base_price, None);
    }

    #[test]
    fn test_response_serializes_price_as_string() {
        let json = serde_json::to_value(PropertyResponse::from(stored())).unwrap();
        assert_eq!(json["base_price"], "10");
    }
}
