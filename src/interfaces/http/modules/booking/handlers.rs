//! Booking HTTP handlers

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;

use crate::application::SharedBookingService;
use crate::interfaces::http::common::{
    bad_request, error_response, ApiError, ApiResponse, ValidatedJson,
};

use super::dto::*;

/// Application state for booking handlers.
#[derive(Clone)]
pub struct BookingAppState {
    pub service: SharedBookingService,
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| bad_request(format!("Invalid {}: {}", field, e)))
}

/// `?id=` that is missing or not a number gets the usual error envelope.
fn reservation_id(query: Result<Query<IdParams>, QueryRejection>) -> Result<i64, ApiError> {
    query
        .map(|Query(params)| params.id)
        .map_err(|e| bad_request(format!("Invalid id: {}", e.body_text())))
}

#[utoipa::path(
    get,
    path = "/api/booking/status",
    tag = "Booking",
    params(StatusParams),
    responses(
        (status = 200, description = "Days in [startDate, endDate) with room left", body = ApiResponse<Vec<NaiveDate>>),
        (status = 400, description = "Start or end date is not correct")
    )
)]
pub async fn get_status(
    State(state): State<BookingAppState>,
    Query(params): Query<StatusParams>,
) -> Result<Json<ApiResponse<Vec<NaiveDate>>>, ApiError> {
    let window = state.service.policy().window();
    let start = match params.start_date.as_deref() {
        Some(s) => parse_date("startDate", s)?,
        None => window.first,
    };
    let end = match params.end_date.as_deref() {
        Some(s) => parse_date("endDate", s)?,
        None => window.last,
    };

    let days = state
        .service
        .availability(start, end)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(days)))
}

#[utoipa::path(
    post,
    path = "/api/booking/reserve",
    tag = "Booking",
    request_body = ReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<CreatedReservationDto>),
        (status = 400, description = "Invalid dates or no capacity left"),
        (status = 422, description = "Invalid name or email")
    )
)]
pub async fn reserve(
    State(state): State<BookingAppState>,
    ValidatedJson(request): ValidatedJson<ReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedReservationDto>>), ApiError> {
    let id = state
        .service
        .reserve(request.into())
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreatedReservationDto { id })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/booking/{id}",
    tag = "Booking",
    params(("id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Unknown or cancelled reservation")
    )
)]
pub async fn get_reservation(
    State(state): State<BookingAppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let reservation = state.service.get(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    put,
    path = "/api/booking/change",
    tag = "Booking",
    params(IdParams),
    request_body = ReservationRequest,
    responses(
        (status = 200, description = "Reservation updated", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Invalid id, invalid dates or no capacity left"),
        (status = 404, description = "Unknown or cancelled reservation")
    )
)]
pub async fn change(
    State(state): State<BookingAppState>,
    query: Result<Query<IdParams>, QueryRejection>,
    ValidatedJson(request): ValidatedJson<ReservationRequest>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let id = reservation_id(query)?;
    let updated = state
        .service
        .change(id, request.into())
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(updated.into())))
}

#[utoipa::path(
    put,
    path = "/api/booking/cancel",
    tag = "Booking",
    params(IdParams),
    responses(
        (status = 200, description = "Reservation cancelled", body = ApiResponse<String>),
        (status = 400, description = "Missing or invalid id"),
        (status = 404, description = "Unknown or already cancelled reservation")
    )
)]
pub async fn cancel(
    State(state): State<BookingAppState>,
    query: Result<Query<IdParams>, QueryRejection>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let id = reservation_id(query)?;
    state
        .service
        .cancel(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        "Reservation is cancelled".to_string(),
    )))
}
