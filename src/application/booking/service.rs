//! Booking business logic service

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::domain::{
    CapacityEngine, DatePolicy, DomainError, DomainResult, Reservation, ReservationDetails,
    ReservationRepository, VerifyMode,
};

pub type SharedBookingService = Arc<BookingService>;

/// Service for reservation use cases.
///
/// Each call reads from the store, validates, and writes at most once.
/// `reserve`, `change` and `cancel` hold `admission` from their first read to
/// their write, so requests served by this process cannot both take the last
/// slot, and a cancel cannot be overwritten by a change that read before it.
pub struct BookingService {
    repo: Arc<dyn ReservationRepository>,
    engine: CapacityEngine,
    policy: DatePolicy,
    admission: Mutex<()>,
}

impl BookingService {
    pub fn new(
        repo: Arc<dyn ReservationRepository>,
        engine: CapacityEngine,
        policy: DatePolicy,
    ) -> Self {
        Self {
            repo,
            engine,
            policy,
            admission: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> &DatePolicy {
        &self.policy
    }

    /// Days in `[start, end)` that still have room.
    pub async fn availability(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<NaiveDate>> {
        let result = self.query_availability(start, end).await;
        record("availability", &result);
        result
    }

    async fn query_availability(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<NaiveDate>> {
        self.check_dates(start, end, VerifyMode::Status)?;
        let overlapping = self.repo.find_overlapping(start, end).await?;
        Ok(self.engine.available_days(start, end, &overlapping))
    }

    /// Create a reservation and return its new id.
    pub async fn reserve(&self, details: ReservationDetails) -> DomainResult<i64> {
        let result = self.create(details).await;
        record("reserve", &result);
        result
    }

    async fn create(&self, details: ReservationDetails) -> DomainResult<i64> {
        let (start, end) = (details.start_date, details.end_date);
        self.check_dates(start, end, VerifyMode::Reservation)?;

        let _guard = self.admission.lock().await;
        self.check_capacity(start, end, None).await?;

        let saved = self.repo.save(details).await?;
        info!(id = saved.id, %start, %end, "Reservation created");
        Ok(saved.id)
    }

    /// Change holder and dates of an active reservation.
    pub async fn change(&self, id: i64, details: ReservationDetails) -> DomainResult<Reservation> {
        let result = self.update(id, details).await;
        record("change", &result);
        result
    }

    async fn update(&self, id: i64, details: ReservationDetails) -> DomainResult<Reservation> {
        // The write carries the `cancelled` flag read here, so a concurrent
        // cancel must not land between the read and the write.
        let _guard = self.admission.lock().await;
        let mut existing = self.find_active(id).await?;
        let (start, end) = (details.start_date, details.end_date);
        self.check_dates(start, end, VerifyMode::Reservation)?;

        self.check_capacity(start, end, Some(id)).await?;

        existing.apply(details);
        let updated = self.repo.update(existing).await?;
        info!(id, %start, %end, "Reservation changed");
        Ok(updated)
    }

    /// Soft-delete an active reservation.
    pub async fn cancel(&self, id: i64) -> DomainResult<()> {
        let result = self.soft_delete(id).await;
        record("cancel", &result);
        result
    }

    async fn soft_delete(&self, id: i64) -> DomainResult<()> {
        let _guard = self.admission.lock().await;
        let mut existing = self.find_active(id).await?;
        existing.cancel();
        self.repo.update(existing).await?;
        info!(id, "Reservation cancelled");
        Ok(())
    }

    /// Fetch an active reservation. Cancelled ones are reported as not found.
    pub async fn get(&self, id: i64) -> DomainResult<Reservation> {
        let result = self.find_active(id).await;
        record("get", &result);
        result
    }

    async fn find_active(&self, id: i64) -> DomainResult<Reservation> {
        match self.repo.find_by_id(id).await? {
            Some(r) if r.is_active() => Ok(r),
            _ => Err(DomainError::reservation_not_found(id)),
        }
    }

    fn check_dates(&self, start: NaiveDate, end: NaiveDate, mode: VerifyMode) -> DomainResult<()> {
        if self.policy.verify(start, end, mode) {
            Ok(())
        } else {
            debug!(%start, %end, ?mode, "Date range rejected");
            Err(DomainError::InvalidRange { start, end })
        }
    }

    async fn check_capacity(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<i64>,
    ) -> DomainResult<()> {
        let overlapping = self.repo.find_overlapping(start, end).await?;
        if self.engine.admits(start, end, &overlapping, exclude) {
            Ok(())
        } else {
            debug!(%start, %end, limit = self.engine.limit(), "No capacity left");
            Err(DomainError::CapacityExceeded { start, end })
        }
    }
}

fn record<T>(operation: &'static str, result: &DomainResult<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(DomainError::InvalidRange { .. }) => "invalid_range",
        Err(DomainError::CapacityExceeded { .. }) => "capacity_exceeded",
        Err(DomainError::NotFound { .. }) => "not_found",
        Err(e @ DomainError::Storage(_)) => {
            error!(operation, error = %e, "Booking operation failed");
            "storage_error"
        }
    };
    metrics::counter!("booking_operations_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Days;

    use crate::domain::booking::date_policy::DEFAULT_MAX_STAY_DAYS;
    use crate::domain::FixedClock;
    use crate::infrastructure::InMemoryReservationRepository;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn day(n: u64) -> NaiveDate {
        today() + Days::new(n)
    }

    fn details(name: &str, start: u64, end: u64) -> ReservationDetails {
        ReservationDetails {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            start_date: day(start),
            end_date: day(end),
        }
    }

    fn service_with(repo: Arc<dyn ReservationRepository>, capacity: u32) -> BookingService {
        BookingService::new(
            repo,
            CapacityEngine::new(capacity),
            DatePolicy::new(Arc::new(FixedClock(today())), DEFAULT_MAX_STAY_DAYS),
        )
    }

    fn service(capacity: u32) -> BookingService {
        service_with(Arc::new(InMemoryReservationRepository::new()), capacity)
    }

    #[tokio::test]
    async fn single_capacity_scenario() {
        let svc = service(1);
        let x = svc.reserve(details("X", 1, 3)).await.unwrap();
        assert!(x > 0);

        let days = svc.availability(day(1), day(4)).await.unwrap();
        assert_eq!(days, vec![day(3)]);

        let err = svc.reserve(details("Y", 1, 3)).await.unwrap_err();
        assert!(matches!(err, DomainError::CapacityExceeded { .. }));

        let y = svc.reserve(details("Y", 3, 4)).await.unwrap();
        assert_ne!(x, y);
        assert!(svc.availability(day(1), day(4)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn availability_rejects_invalid_range() {
        let svc = service(1);
        let err = svc.availability(today(), day(3)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidRange { .. }));
        let err = svc.availability(day(4), day(2)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidRange { .. }));
    }

    #[tokio::test]
    async fn availability_has_no_stay_cap() {
        let svc = service(1);
        let days = svc.availability(day(1), day(10)).await.unwrap();
        assert_eq!(days.len(), 9);
    }

    #[tokio::test]
    async fn reserve_rejects_long_stay() {
        let svc = service(5);
        let err = svc.reserve(details("Long", 1, 5)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidRange { .. }));
        assert!(svc.reserve(details("Ok", 1, 4)).await.is_ok());
    }

    #[tokio::test]
    async fn capacity_two_allows_two_overlapping_stays() {
        let svc = service(2);
        svc.reserve(details("A", 2, 4)).await.unwrap();
        svc.reserve(details("B", 3, 5)).await.unwrap();
        assert!(matches!(
            svc.reserve(details("C", 3, 4)).await,
            Err(DomainError::CapacityExceeded { .. })
        ));
        assert_eq!(
            svc.availability(day(1), day(6)).await.unwrap(),
            vec![day(1), day(2), day(4), day(5)]
        );
    }

    #[tokio::test]
    async fn get_returns_active_reservation() {
        let svc = service(1);
        let id = svc.reserve(details("Ada", 1, 2)).await.unwrap();
        let r = svc.get(id).await.unwrap();
        assert_eq!(r.name, "Ada");
        assert_eq!(r.start_date, day(1));
        assert!(!r.cancelled);
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let svc = service(1);
        assert!(matches!(
            svc.get(404).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn change_can_shift_within_own_footprint() {
        let svc = service(1);
        let id = svc.reserve(details("Ada", 1, 3)).await.unwrap();

        let updated = svc.change(id, details("Ada B", 2, 4)).await.unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.name, "Ada B");
        assert_eq!(updated.start_date, day(2));
        assert_eq!(updated.end_date, day(4));
        assert_eq!(svc.availability(day(1), day(5)).await.unwrap(), vec![day(1), day(4)]);
    }

    #[tokio::test]
    async fn change_is_blocked_by_other_reservations() {
        let svc = service(1);
        let a = svc.reserve(details("A", 1, 2)).await.unwrap();
        svc.reserve(details("B", 3, 4)).await.unwrap();

        let err = svc.change(a, details("A", 2, 4)).await.unwrap_err();
        assert!(matches!(err, DomainError::CapacityExceeded { .. }));
        assert_eq!(svc.get(a).await.unwrap().end_date, day(2));
    }

    #[tokio::test]
    async fn change_validates_dates() {
        let svc = service(1);
        let id = svc.reserve(details("A", 1, 2)).await.unwrap();
        let err = svc.change(id, details("A", 1, 6)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidRange { .. }));
    }

    #[tokio::test]
    async fn change_unknown_is_not_found_before_date_check() {
        let svc = service(1);
        let err = svc.change(77, details("A", 0, 9)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn cancel_frees_capacity_and_hides_reservation() {
        let svc = service(1);
        let id = svc.reserve(details("A", 1, 3)).await.unwrap();
        svc.cancel(id).await.unwrap();

        assert!(matches!(svc.get(id).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(
            svc.change(id, details("A", 1, 2)).await,
            Err(DomainError::NotFound { .. })
        ));
        assert_eq!(svc.availability(day(1), day(3)).await.unwrap(), vec![day(1), day(2)]);
        assert!(svc.reserve(details("B", 1, 3)).await.is_ok());
    }

    #[tokio::test]
    async fn cancel_twice_is_not_found() {
        let svc = service(1);
        let id = svc.reserve(details("A", 1, 3)).await.unwrap();
        svc.cancel(id).await.unwrap();
        assert!(matches!(svc.cancel(id).await, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn cancelled_record_stays_in_store() {
        let repo = Arc::new(InMemoryReservationRepository::new());
        let svc = service_with(repo.clone(), 1);
        let id = svc.reserve(details("A", 1, 3)).await.unwrap();
        svc.cancel(id).await.unwrap();

        let stored = repo.find_by_id(id).await.unwrap().unwrap();
        assert!(stored.cancelled);
    }

    #[tokio::test]
    async fn concurrent_reserves_do_not_overbook() {
        let svc = Arc::new(service(1));
        let mut tasks = Vec::new();
        for i in 0..8 {
            let svc = svc.clone();
            tasks.push(tokio::spawn(async move {
                svc.reserve(details(&format!("G{i}"), 2, 3)).await
            }));
        }
        let mut accepted = 0;
        for t in tasks {
            if t.await.unwrap().is_ok() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
    }

    struct BrokenStore;

    #[async_trait]
    impl ReservationRepository for BrokenStore {
        async fn save(&self, _details: ReservationDetails) -> DomainResult<Reservation> {
            Err(DomainError::Storage("connection refused".into()))
        }

        async fn find_by_id(&self, _id: i64) -> DomainResult<Option<Reservation>> {
            Err(DomainError::Storage("connection refused".into()))
        }

        async fn update(&self, _reservation: Reservation) -> DomainResult<Reservation> {
            Err(DomainError::Storage("connection refused".into()))
        }

        async fn find_overlapping(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> DomainResult<Vec<Reservation>> {
            Err(DomainError::Storage("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let svc = service_with(Arc::new(BrokenStore), 1);
        assert!(matches!(
            svc.availability(day(1), day(2)).await,
            Err(DomainError::Storage(_))
        ));
        assert!(matches!(
            svc.reserve(details("A", 1, 2)).await,
            Err(DomainError::Storage(_))
        ));
        assert!(matches!(svc.get(1).await, Err(DomainError::Storage(_))));
        assert!(matches!(svc.cancel(1).await, Err(DomainError::Storage(_))));
    }

    /// Holds the first `update` until released, so a second operation can be
    /// started while a change is between its read and its write.
    struct GatedStore {
        inner: InMemoryReservationRepository,
        gate_armed: std::sync::atomic::AtomicBool,
        entered: tokio::sync::Notify,
        release: tokio::sync::Notify,
    }

    #[async_trait]
    impl ReservationRepository for GatedStore {
        async fn save(&self, details: ReservationDetails) -> DomainResult<Reservation> {
            self.inner.save(details).await
        }

        async fn find_by_id(&self, id: i64) -> DomainResult<Option<Reservation>> {
            self.inner.find_by_id(id).await
        }

        async fn update(&self, reservation: Reservation) -> DomainResult<Reservation> {
            if self
                .gate_armed
                .swap(false, std::sync::atomic::Ordering::SeqCst)
            {
                self.entered.notify_one();
                self.release.notified().await;
            }
            self.inner.update(reservation).await
        }

        async fn find_overlapping(
            &self,
            start: NaiveDate,
            end: NaiveDate,
        ) -> DomainResult<Vec<Reservation>> {
            self.inner.find_overlapping(start, end).await
        }
    }

    #[tokio::test]
    async fn cancel_waits_for_in_flight_change() {
        let store = Arc::new(GatedStore {
            inner: InMemoryReservationRepository::new(),
            gate_armed: std::sync::atomic::AtomicBool::new(false),
            entered: tokio::sync::Notify::new(),
            release: tokio::sync::Notify::new(),
        });
        let svc = Arc::new(service_with(store.clone(), 1));
        let id = svc.reserve(details("A", 1, 3)).await.unwrap();
        store
            .gate_armed
            .store(true, std::sync::atomic::Ordering::SeqCst);

        let change = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.change(id, details("B", 2, 4)).await })
        };
        store.entered.notified().await;

        let cancel = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.cancel(id).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!cancel.is_finished());

        store.release.notify_one();
        assert_eq!(change.await.unwrap().unwrap().name, "B");
        cancel.await.unwrap().unwrap();

        assert!(matches!(svc.get(id).await, Err(DomainError::NotFound { .. })));
        assert!(store.inner.find_by_id(id).await.unwrap().unwrap().cancelled);
    }

    #[tokio::test]
    async fn date_policy_runs_before_store() {
        let svc = service_with(Arc::new(BrokenStore), 1);
        assert!(matches!(
            svc.reserve(details("A", 0, 2)).await,
            Err(DomainError::InvalidRange { .. })
        ));
    }
}
