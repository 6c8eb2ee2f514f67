//! Reservation repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{Reservation, ReservationDetails};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Persist a new reservation; the store assigns the id
    async fn save(&self, details: ReservationDetails) -> DomainResult<Reservation>;

    /// Find reservation by ID, cancelled ones included
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Reservation>>;

    /// Overwrite an existing reservation by ID
    async fn update(&self, reservation: Reservation) -> DomainResult<Reservation>;

    /// Find non-cancelled reservations with `end_date >= start` and
    /// `start_date <= end` (both bounds inclusive).
    async fn find_overlapping(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Reservation>>;
}
