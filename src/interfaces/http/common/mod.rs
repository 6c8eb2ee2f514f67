//! Shared HTTP building blocks

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response envelope
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "message"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload, `null` on failure
    pub data: Option<T>,
    /// Error description, omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every handler's return type
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Map a domain failure onto a status code and a client-safe message.
/// Storage details are logged, never returned.
pub fn error_response(e: DomainError) -> ApiError {
    if e.is_client_error() {
        debug!(error = %e, "Request rejected");
    } else {
        error!(error = %e, "Request failed");
    }

    let (status, message) = match &e {
        DomainError::InvalidRange { .. } => (
            StatusCode::BAD_REQUEST,
            "Start or end date is not correct".to_string(),
        ),
        DomainError::CapacityExceeded { .. } => (
            StatusCode::BAD_REQUEST,
            "Selected time range is not available".to_string(),
        ),
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
        DomainError::Storage(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        ),
    };
    (status, Json(ApiResponse::error(message)))
}

/// 400 for request input that never reached the domain layer
pub fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let d = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        let cases = [
            (DomainError::InvalidRange { start: d, end: d }, StatusCode::BAD_REQUEST),
            (DomainError::CapacityExceeded { start: d, end: d }, StatusCode::BAD_REQUEST),
            (DomainError::reservation_not_found(3), StatusCode::NOT_FOUND),
            (DomainError::Storage("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let (status, _) = error_response(err);
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn storage_details_are_not_leaked() {
        let (_, Json(body)) = error_response(DomainError::Storage("password=hunter2".into()));
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
        assert!(!body.success);
    }

    #[test]
    fn success_envelope_omits_error() {
        let json = serde_json::to_value(ApiResponse::success(5)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 5}));
    }
}
