use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

use crate::db::DbPool;
use crate::entities::flight::{self, Entity as FlightEntity};
use crate::errors::ServiceError;

/// Flight summary exposed to callers of the lookup collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightSummary {
    pub flight_id: i64,
    pub flight_number: String,
    pub airplane_id: i64,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub status: String,
    pub base_price: Decimal,
}

impl From<flight::Model> for FlightSummary {
    fn from(model: flight::Model) -> Self {
        Self {
            flight_id: model.id,
            flight_number: model.flight_number,
            airplane_id: model.airplane_id,
            departure_time: model.departure_time,
            arrival_time: model.arrival_time,
            status: model.status,
            base_price: model.base_price,
        }
    }
}

/// Read-only flight lookups.
#[derive(Clone)]
pub struct FlightService {
    db_pool: Arc<DbPool>,
}

impl FlightService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn get_flight(&self, flight_id: i64) -> Result<FlightSummary, ServiceError> {
        let db = &*self.db_pool;

        let flight = FlightEntity::find_by_id(flight_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Flight {} not found", flight_id)))?;

        Ok(FlightSummary::from(flight))
    }
}
