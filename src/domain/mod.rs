//! Domain layer
//!
//! - `reservation`: Reservation aggregate and its repository interface
//! - `booking`: capacity engine and date policy (pure, no I/O)

pub mod booking;
pub mod reservation;

pub use booking::{CapacityEngine, Clock, DatePolicy, FixedClock, OccupancyMap, SystemClock, VerifyMode};
pub use reservation::{Reservation, ReservationDetails, ReservationRepository};

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
