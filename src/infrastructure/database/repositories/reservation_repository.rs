//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{
    DomainError, DomainResult, Reservation, ReservationDetails, ReservationRepository,
};
use crate::infrastructure::database::entities::reservation;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        name: m.fullname,
        email: m.email,
        start_date: m.start_date,
        end_date: m.end_date,
        cancelled: m.cancelled,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn save(&self, d: ReservationDetails) -> DomainResult<Reservation> {
        debug!("Saving reservation: {} .. {}", d.start_date, d.end_date);

        let model = reservation::ActiveModel {
            id: NotSet,
            fullname: Set(d.name),
            email: Set(d.email),
            start_date: Set(d.start_date),
            end_date: Set(d.end_date),
            cancelled: Set(false),
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn update(&self, r: Reservation) -> DomainResult<Reservation> {
        debug!("Updating reservation: {}", r.id);

        let existing = reservation::Entity::find_by_id(r.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::reservation_not_found(r.id));
        }

        let model = reservation::ActiveModel {
            id: Set(r.id),
            fullname: Set(r.name),
            email: Set(r.email),
            start_date: Set(r.start_date),
            end_date: Set(r.end_date),
            cancelled: Set(r.cancelled),
        };
        let updated = model.update(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(updated))
    }

    async fn find_overlapping(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::EndDate.gte(start))
            .filter(reservation::Column::StartDate.lte(end))
            .filter(reservation::Column::Cancelled.eq(false))
            .order_by_asc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
