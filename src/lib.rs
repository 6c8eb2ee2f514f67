//! # Booking Service
//!
//! Date-range reservations against a single shared resource with a fixed
//! daily capacity.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Reservation entity, capacity engine, date policy, repository trait
//! - **application**: Booking use cases (availability, reserve, change, cancel, get)
//! - **infrastructure**: SeaORM persistence and the in-memory store
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Errors and graceful shutdown plumbing

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, InMemoryReservationRepository};
pub use infrastructure::database::repositories::SeaOrmReservationRepository;

// Re-export API router
pub use interfaces::http::create_api_router;
