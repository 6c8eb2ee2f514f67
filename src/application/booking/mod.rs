//! Booking use cases
//!
//! Composes the date policy, the capacity engine and the reservation store.

pub mod service;

pub use service::{BookingService, SharedBookingService};
