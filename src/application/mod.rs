//! Application layer: booking use cases

pub mod booking;

// Re-export key types for convenience
pub use booking::{BookingService, SharedBookingService};
