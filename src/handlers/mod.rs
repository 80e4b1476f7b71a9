pub mod bookings;
pub mod flights;
pub mod health;

use std::sync::Arc;

use crate::config::BookingPolicyConfig;
use crate::db::DbPool;
use crate::events::EventSender;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub booking: Arc<crate::services::bookings::BookingService>,
    pub flight: Arc<crate::services::flights::FlightService>,
    pub seat: Arc<crate::services::seats::SeatService>,
}

impl AppServices {
    pub fn new(
        db_pool: Arc<DbPool>,
        policy: BookingPolicyConfig,
        event_sender: Arc<EventSender>,
    ) -> Self {
        let booking = Arc::new(crate::services::bookings::BookingService::new(
            db_pool.clone(),
            policy,
            Some(event_sender),
        ));
        let flight = Arc::new(crate::services::flights::FlightService::new(db_pool.clone()));
        let seat = Arc::new(crate::services::seats::SeatService::new(db_pool));

        Self {
            booking,
            flight,
            seat,
        }
    }
}
