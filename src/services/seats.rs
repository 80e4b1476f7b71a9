use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

use crate::db::DbPool;
use crate::entities::flight::Entity as FlightEntity;
use crate::entities::seat::{self, Entity as SeatEntity};
use crate::errors::ServiceError;

/// Seat summary exposed to callers of the lookup collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatSummary {
    pub seat_id: i64,
    pub seat_number: String,
    pub class: String,
    pub is_available: bool,
}

impl From<seat::Model> for SeatSummary {
    fn from(model: seat::Model) -> Self {
        Self {
            seat_id: model.id,
            seat_number: model.seat_number,
            class: model.class,
            is_available: model.is_available,
        }
    }
}

/// Read-only seat lookups. Availability shown here is the optimistic flag;
/// the booking transaction re-verifies it authoritatively.
#[derive(Clone)]
pub struct SeatService {
    db_pool: Arc<DbPool>,
}

impl SeatService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists the seat map of the airplane serving `flight_id`.
    #[instrument(skip(self))]
    pub async fn list_seats_for_flight(
        &self,
        flight_id: i64,
    ) -> Result<Vec<SeatSummary>, ServiceError> {
        let db = &*self.db_pool;

        let flight = FlightEntity::find_by_id(flight_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Flight {} not found", flight_id)))?;

        let seats = SeatEntity::find()
            .filter(seat::Column::AirplaneId.eq(flight.airplane_id))
            .order_by_asc(seat::Column::SeatNumber)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(seats.into_iter().map(SeatSummary::from).collect())
    }

    /// Seat lookup by id-set scoped to one airplane, mirroring the interface
    /// the booking transaction consumes inside its own transaction.
    #[instrument(skip(self, seat_ids))]
    pub async fn find_by_ids_for_airplane(
        &self,
        airplane_id: i64,
        seat_ids: &[i64],
    ) -> Result<Vec<SeatSummary>, ServiceError> {
        if seat_ids.is_empty() {
            return Ok(Vec::new());
        }

        let db = &*self.db_pool;

        let seats = SeatEntity::find()
            .filter(seat::Column::Id.is_in(seat_ids.to_vec()))
            .filter(seat::Column::AirplaneId.eq(airplane_id))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(seats.into_iter().map(SeatSummary::from).collect())
    }
}
