//! Reservation domain entity

use chrono::NaiveDate;

/// Client-supplied part of a reservation, used to create or change one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDetails {
    /// Holder's full name
    pub name: String,
    /// Holder's contact email
    pub email: String,
    /// First occupied day (inclusive)
    pub start_date: NaiveDate,
    /// Departure day (exclusive)
    pub end_date: NaiveDate,
}

/// A stay occupying the half-open range `[start_date, end_date)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Store-assigned identifier, immutable after creation
    pub id: i64,
    pub name: String,
    pub email: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Soft-delete flag; cancelled reservations never count towards occupancy
    pub cancelled: bool,
}

impl Reservation {
    pub fn new(id: i64, details: ReservationDetails) -> Self {
        Self {
            id,
            name: details.name,
            email: details.email,
            start_date: details.start_date,
            end_date: details.end_date,
            cancelled: false,
        }
    }

    /// Overwrite holder and dates. The cancelled flag is left untouched.
    pub fn apply(&mut self, details: ReservationDetails) {
        self.name = details.name;
        self.email = details.email;
        self.start_date = details.start_date;
        self.end_date = details.end_date;
    }

    /// Cancel this reservation
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Check if this reservation still holds its days
    pub fn is_active(&self) -> bool {
        !self.cancelled
    }

    /// Iterate over the occupied days, `start_date` included, `end_date` excluded.
    pub fn nights(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |d| *d < end)
    }
}

// ── Tests ──────────────────────────────────────────────────────
