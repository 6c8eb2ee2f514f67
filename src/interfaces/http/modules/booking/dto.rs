//! Booking DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{Reservation, ReservationDetails};

/// Query for `GET /api/booking/status`. Dates are `YYYY-MM-DD`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatusParams {
    /// First day to check. Defaults to tomorrow
    pub start_date: Option<String>,
    /// Day after the last one to check. Defaults to one month from today
    pub end_date: Option<String>,
}

/// Reservation selected by `?id=`
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdParams {
    /// Reservation ID
    pub id: i64,
}

/// Body for reserving or changing a stay
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    /// Holder's full name
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Holder's contact email
    #[validate(email)]
    pub email: String,
    /// Arrival day (inclusive)
    pub start_date: NaiveDate,
    /// Departure day (exclusive)
    pub end_date: NaiveDate,
}

impl From<ReservationRequest> for ReservationDetails {
    fn from(r: ReservationRequest) -> Self {
        ReservationDetails {
            name: r.name,
            email: r.email,
            start_date: r.start_date,
            end_date: r.end_date,
        }
    }
}

/// Reservation details in API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            start_date: r.start_date,
            end_date: r.end_date,
        }
    }
}

/// Response from reserving
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedReservationDto {
    pub id: i64,
}
