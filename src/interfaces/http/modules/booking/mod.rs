//! Booking endpoints: availability, reserve, get, change, cancel

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
