//! Pricing engine module.
//!
//! Resolves a booking's final price day by day from its property's pricing
//! rules, and exposes CRUD over those rules plus a quote endpoint.

pub mod calculators;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{resolve, resolve_breakdown, DayPrice, PriceBreakdown};
pub use models::PricingRule;
pub use routes::router;
pub use services::{price_stay, quote_stay, PricingError};
