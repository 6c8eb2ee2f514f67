//! In-memory reservation store for development and testing

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;

use crate::domain::{
    DomainError, DomainResult, Reservation, ReservationDetails, ReservationRepository,
};

/// DashMap-backed store. Ids start at 1 and are never reused.
pub struct InMemoryReservationRepository {
    reservations: DashMap<i64, Reservation>,
    id_counter: AtomicI64,
}

impl InMemoryReservationRepository {
    pub fn new() -> Self {
        Self {
            reservations: DashMap::new(),
            id_counter: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }
}

impl Default for InMemoryReservationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn save(&self, details: ReservationDetails) -> DomainResult<Reservation> {
        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
        let reservation = Reservation::new(id, details);
        self.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn update(&self, reservation: Reservation) -> DomainResult<Reservation> {
        match self.reservations.get_mut(&reservation.id) {
            Some(mut slot) => {
                *slot = reservation.clone();
                Ok(reservation)
            }
            None => Err(DomainError::reservation_not_found(reservation.id)),
        }
    }

    async fn find_overlapping(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Reservation>> {
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.is_active() && r.end_date >= start && r.start_date <= end)
            .map(|r| r.value().clone())
            .collect();
        found.sort_by_key(|r| r.id);
        Ok(found)
    }
}
