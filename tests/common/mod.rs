#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

use skybook_api::config::BookingPolicyConfig;
use skybook_api::db::{self, DbPool};
use skybook_api::entities::{airplane, booking, flight, seat, ticket};
use skybook_api::entities::booking::BookingStatus;
use skybook_api::entities::flight::FlightStatus;
use skybook_api::entities::seat::SeatClass;
use skybook_api::services::bookings::BookingService;

/// Spins up an in-memory SQLite database with the full schema applied.
pub async fn setup_db() -> Arc<DbPool> {
    let pool = db::connect_in_memory_for_tests()
        .await
        .expect("in-memory database setup");
    Arc::new(pool)
}

pub fn booking_service(db: &Arc<DbPool>) -> BookingService {
    BookingService::new(db.clone(), BookingPolicyConfig::default(), None)
}

pub async fn seed_airplane(db: &DbPool) -> i64 {
    let model = airplane::ActiveModel {
        model: Set("A321".to_string()),
        registration: Set(format!("VN-{}", Uuid::new_v4().simple())),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed airplane");
    model.id
}

pub async fn seed_flight(
    db: &DbPool,
    airplane_id: i64,
    departure_time: DateTime<Utc>,
    base_price: Decimal,
    status: FlightStatus,
) -> i64 {
    let model = flight::ActiveModel {
        flight_number: Set(format!("SB{}", Uuid::new_v4().simple())),
        airplane_id: Set(airplane_id),
        departure_time: Set(departure_time),
        arrival_time: Set(departure_time + Duration::hours(2)),
        status: Set(status.as_str().to_string()),
        base_price: Set(base_price),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed flight");
    model.id
}

pub async fn seed_seat(
    db: &DbPool,
    airplane_id: i64,
    seat_number: &str,
    class: SeatClass,
    is_available: bool,
) -> i64 {
    let model = seat::ActiveModel {
        airplane_id: Set(airplane_id),
        seat_number: Set(seat_number.to_string()),
        class: Set(class.as_str().to_string()),
        is_available: Set(is_available),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed seat");
    model.id
}

/// Inserts a booking and a live ticket directly, bypassing the service. Used
/// to stage states the service cannot reach on its own (e.g. a seat whose
/// availability flag disagrees with the ticket table).
pub async fn seed_active_ticket(
    db: &DbPool,
    customer_id: Uuid,
    flight_id: i64,
    seat_id: i64,
    price: Decimal,
) -> Uuid {
    let now = Utc::now();
    let booking_id = Uuid::new_v4();
    booking::ActiveModel {
        id: Set(booking_id),
        customer_id: Set(customer_id),
        flight_id: Set(flight_id),
        status: Set(BookingStatus::Booked.as_str().to_string()),
        total_price: Set(price),
        created_at: Set(now),
        updated_at: Set(Some(now)),
    }
    .insert(db)
    .await
    .expect("seed booking");

    ticket::ActiveModel {
        id: Set(Uuid::new_v4()),
        booking_id: Set(booking_id),
        seat_id: Set(seat_id),
        active_seat_id: Set(Some(seat_id)),
        passenger_name: Set("Staged Passenger".to_string()),
        passenger_dob: Set(None),
        price: Set(price),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .expect("seed ticket");

    booking_id
}

/// Departure far enough out that the booking window is comfortably open.
pub fn departure_in_hours(hours: i64) -> DateTime<Utc> {
    Utc::now() + Duration::hours(hours)
}
