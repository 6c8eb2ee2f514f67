//! Temporal rules a date range must satisfy before it reaches the capacity engine.

use std::sync::Arc;

use chrono::{Days, Months, NaiveDate};

use super::clock::Clock;

/// Longest stay accepted when reserving, in days.
pub const DEFAULT_MAX_STAY_DAYS: u64 = 4;

/// Which use case is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMode {
    /// Read-only availability query: no stay-length cap
    Status,
    /// Create or change a reservation
    Reservation,
}

/// Bookable dates, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl BookingWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }
}

#[derive(Clone)]
pub struct DatePolicy {
    clock: Arc<dyn Clock>,
    max_stay_days: u64,
}

impl DatePolicy {
    pub fn new(clock: Arc<dyn Clock>, max_stay_days: u64) -> Self {
        Self {
            clock,
            max_stay_days,
        }
    }

    /// From tomorrow through the same day next month. Month arithmetic clamps
    /// to the last day of a shorter month (Jan 31 → Feb 28).
    pub fn window(&self) -> BookingWindow {
        let today = self.clock.today();
        BookingWindow {
            first: today.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX),
            last: today
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn verify(&self, start: NaiveDate, end: NaiveDate, mode: VerifyMode) -> bool {
        let window = self.window();
        if !window.contains(start) || !window.contains(end) {
            return false;
        }
        if start > end {
            return false;
        }
        match mode {
            VerifyMode::Status => true,
            VerifyMode::Reservation => end
                .checked_sub_days(Days::new(self.max_stay_days))
                .map_or(true, |earliest| start > earliest),
        }
    }
}

impl std::fmt::Debug for DatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatePolicy")
            .field("today", &self.clock.today())
            .field("max_stay_days", &self.max_stay_days)
            .finish()
    }
}

// ── Tests ──────────────────────────────────────────────────────
