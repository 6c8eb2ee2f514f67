//! Capacity engine
//!
//! Counts how many active reservations cover each calendar day and decides
//! whether a date range still fits under the daily limit.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::reservation::Reservation;

/// Per-day count of active reservations. Built per request, never stored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OccupancyMap {
    counts: BTreeMap<NaiveDate, u32>,
}

impl OccupancyMap {
    /// Count every night of every active reservation, skipping `exclude`.
    pub fn build(reservations: &[Reservation], exclude: Option<i64>) -> Self {
        let mut counts = BTreeMap::new();
        for res in reservations
            .iter()
            .filter(|r| r.is_active() && Some(r.id) != exclude)
        {
            for night in res.nights() {
                *counts.entry(night).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    /// Occupancy of `date`; days nobody booked count as zero.
    pub fn get(&self, date: NaiveDate) -> u32 {
        self.counts.get(&date).copied().unwrap_or(0)
    }
}

/// Admission and availability answers for a fixed daily capacity.
#[derive(Debug, Clone, Copy)]
pub struct CapacityEngine {
    limit: u32,
}

impl CapacityEngine {
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Days in `[start, end)` that still have room, in ascending order.
    pub fn available_days(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        reservations: &[Reservation],
    ) -> Vec<NaiveDate> {
        let occupancy = OccupancyMap::build(reservations, None);
        days(start, end)
            .filter(|day| occupancy.get(*day) < self.limit)
            .collect()
    }

    /// `true` when every day in `[start, end)` has room once the reservation
    /// `exclude` (if any) is discounted.
    pub fn admits(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        reservations: &[Reservation],
        exclude: Option<i64>,
    ) -> bool {
        let occupancy = OccupancyMap::build(reservations, exclude);
        days(start, end).all(|day| occupancy.get(day) < self.limit)
    }
}

fn days(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d < end)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reservation::ReservationDetails;
    use chrono::Days;

    fn day(n: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, 1).unwrap() + Days::new(n)
    }

    fn res(id: i64, start: u64, end: u64) -> Reservation {
        Reservation::new(
            id,
            ReservationDetails {
                name: format!("guest-{id}"),
                email: format!("guest{id}@example.com"),
                start_date: day(start),
                end_date: day(end),
            },
        )
    }

    #[test]
    fn occupancy_counts_half_open_nights() {
        let map = OccupancyMap::build(&[res(1, 1, 3), res(2, 2, 4)], None);
        assert_eq!(map.get(day(0)), 0);
        assert_eq!(map.get(day(1)), 1);
        assert_eq!(map.get(day(2)), 2);
        assert_eq!(map.get(day(3)), 1);
        assert_eq!(map.get(day(4)), 0);
    }

    #[test]
    fn occupancy_skips_excluded_and_cancelled() {
        let mut cancelled = res(3, 1, 2);
        cancelled.cancel();
        let map = OccupancyMap::build(&[res(1, 1, 2), res(2, 1, 2), cancelled], Some(2));
        assert_eq!(map.get(day(1)), 1);
    }

    #[test]
    fn empty_input_means_every_day_available() {
        let engine = CapacityEngine::new(1);
        assert_eq!(
            engine.available_days(day(1), day(4), &[]),
            vec![day(1), day(2), day(3)]
        );
        assert!(engine.admits(day(1), day(4), &[], None));
    }

    #[test]
    fn zero_length_range_is_empty_and_admitted() {
        let engine = CapacityEngine::new(1);
        let full = [res(1, 1, 5)];
        assert!(engine.available_days(day(2), day(2), &full).is_empty());
        assert!(engine.admits(day(2), day(2), &full, None));
    }

    #[test]
    fn non_overlapping_reservations_leave_everything_available() {
        let engine = CapacityEngine::new(1);
        let booked = [res(1, 0, 1), res(2, 5, 7)];
        assert_eq!(
            engine.available_days(day(1), day(5), &booked),
            vec![day(1), day(2), day(3), day(4)]
        );
    }

    #[test]
    fn date_disappears_only_at_capacity() {
        let engine = CapacityEngine::new(3);
        let two = [res(1, 2, 3), res(2, 2, 3)];
        assert!(engine.available_days(day(1), day(4), &two).contains(&day(2)));
        assert!(engine.admits(day(1), day(4), &two, None));

        let three = [res(1, 2, 3), res(2, 2, 3), res(3, 2, 3)];
        assert_eq!(
            engine.available_days(day(1), day(4), &three),
            vec![day(1), day(3)]
        );
        assert!(!engine.admits(day(1), day(4), &three, None));
        assert!(!engine.admits(day(2), day(3), &three, None));
        assert!(engine.admits(day(3), day(5), &three, None));
    }

    #[test]
    fn exclusion_never_reduces_admission() {
        let engine = CapacityEngine::new(1);
        let booked = [res(1, 1, 3), res(2, 4, 5)];
        for id in [1, 2, 99] {
            for (s, e) in [(0, 2), (1, 3), (2, 5), (3, 4)] {
                let plain = engine.admits(day(s), day(e), &booked, None);
                let excluded = engine.admits(day(s), day(e), &booked, Some(id));
                assert!(excluded || !plain, "id={id} range={s}..{e}");
            }
        }
    }

    #[test]
    fn update_is_not_blocked_by_its_own_footprint() {
        let engine = CapacityEngine::new(1);
        let booked = [res(1, 1, 3)];
        assert!(!engine.admits(day(2), day(4), &booked, None));
        assert!(engine.admits(day(2), day(4), &booked, Some(1)));
    }

    #[test]
    fn single_capacity_scenario() {
        let engine = CapacityEngine::new(1);
        let booked = [res(1, 1, 3)];
        assert_eq!(engine.available_days(day(1), day(4), &booked), vec![day(3)]);
        assert!(!engine.admits(day(1), day(3), &booked, None));
        assert!(engine.admits(day(3), day(4), &booked, None));
    }

    #[test]
    fn reservation_touching_range_end_contributes_nothing() {
        // The store prefilter is inclusive, so a stay starting on `end` can show up.
        let engine = CapacityEngine::new(1);
        let booked = [res(1, 4, 6)];
        assert!(engine.admits(day(1), day(4), &booked, None));
        assert_eq!(engine.available_days(day(1), day(4), &booked).len(), 3);
    }
}
