//! Property and booking models

pub mod booking;
pub mod property;
pub mod serde_helpers;

pub use booking::{
    Booking, BookingChange, BookingFilter, BookingResponse, CreateBookingRequest,
    UpdateBookingRequest,
};
pub use property::{
    CreatePropertyRequest, Property, PropertyFilter, PropertyResponse, UpdatePropertyRequest,
};
