//! Booking rules
//!
//! Pure functions over dates and reservations. Nothing here touches storage.

pub mod capacity;
pub mod clock;
pub mod date_policy;

pub use capacity::{CapacityEngine, OccupancyMap};
pub use clock::{Clock, FixedClock, SystemClock};
pub use date_policy::{DatePolicy, VerifyMode};
