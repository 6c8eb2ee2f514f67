//! HTTP REST API interfaces
//!
//! - `common`: response envelope, validated JSON extractor, error mapping
//! - `modules`: handlers grouped by resource, plus request middleware
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiState};
