//! Database access for properties and bookings

pub mod queries;

pub use queries::*;
