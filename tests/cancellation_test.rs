mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use skybook_api::entities::booking::BookingStatus;
use skybook_api::entities::flight::FlightStatus;
use skybook_api::entities::seat::{Entity as SeatEntity, SeatClass};
use skybook_api::entities::ticket::{self, Entity as TicketEntity};
use skybook_api::errors::{BookingDenialReason, ServiceError};
use skybook_api::services::bookings::{CreateBookingRequest, PassengerRequest};

use common::*;

fn passenger(name: &str, seat_id: i64) -> PassengerRequest {
    PassengerRequest {
        name: name.to_string(),
        date_of_birth: None,
        seat_id,
    }
}

#[tokio::test]
async fn cancellation_releases_every_seat_and_clears_live_markers() {
    let db = setup_db().await;
    let airplane_id = seed_airplane(&db).await;
    let flight_id = seed_flight(
        &db,
        airplane_id,
        departure_in_hours(5),
        dec!(1000000),
        FlightStatus::Scheduled,
    )
    .await;
    let seat_a = seed_seat(&db, airplane_id, "11A", SeatClass::Economy, true).await;
    let seat_b = seed_seat(&db, airplane_id, "11B", SeatClass::Business, true).await;

    let svc = booking_service(&db);
    let customer_id = Uuid::new_v4();
    let created = svc
        .create_booking(
            customer_id,
            CreateBookingRequest {
                flight_id,
                passengers: vec![passenger("A B", seat_a), passenger("C D", seat_b)],
            },
        )
        .await
        .unwrap();

    let summary = svc
        .cancel_booking(customer_id, created.booking.booking_id)
        .await
        .expect("cancellation should succeed");
    assert_eq!(summary.status, BookingStatus::Cancelled.as_str());

    for seat_id in [seat_a, seat_b] {
        let seat = SeatEntity::find_by_id(seat_id)
            .one(&*db)
            .await
            .unwrap()
            .unwrap();
        assert!(seat.is_available, "seat {} should be released", seat_id);
    }

    // Ticket rows persist for history, but no longer hold the seat
    let tickets = TicketEntity::find()
        .filter(ticket::Column::BookingId.eq(created.booking.booking_id))
        .all(&*db)
        .await
        .unwrap();
    assert_eq!(tickets.len(), 2);
    assert!(tickets.iter().all(|t| t.active_seat_id.is_none()));
}

#[tokio::test]
async fn cancelling_twice_is_rejected_and_flags_stay_released() {
    let db = setup_db().await;
    let airplane_id = seed_airplane(&db).await;
    let flight_id = seed_flight(
        &db,
        airplane_id,
        departure_in_hours(5),
        dec!(1000000),
        FlightStatus::Scheduled,
    )
    .await;
    let seat_id = seed_seat(&db, airplane_id, "12C", SeatClass::Economy, true).await;

    let svc = booking_service(&db);
    let customer_id = Uuid::new_v4();
    let created = svc
        .create_booking(
            customer_id,
            CreateBookingRequest {
                flight_id,
                passengers: vec![passenger("A B", seat_id)],
            },
        )
        .await
        .unwrap();

    svc.cancel_booking(customer_id, created.booking.booking_id)
        .await
        .unwrap();

    let err = svc
        .cancel_booking(customer_id, created.booking.booking_id)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        ServiceError::BookingNotAllowed(BookingDenialReason::AlreadyCancelled)
    );

    // Not double-toggled
    let seat = SeatEntity::find_by_id(seat_id)
        .one(&*db)
        .await
        .unwrap()
        .unwrap();
    assert!(seat.is_available);
}

#[tokio::test]
async fn cancellation_after_departure_is_rejected() {
    let db = setup_db().await;
    let airplane_id = seed_airplane(&db).await;
    let flight_id = seed_flight(
        &db,
        airplane_id,
        departure_in_hours(-1),
        dec!(1000000),
        FlightStatus::Scheduled,
    )
    .await;
    let seat_id = seed_seat(&db, airplane_id, "13A", SeatClass::Economy, false).await;

    // Stage the booking directly: it was made while the flight was bookable
    let customer_id = Uuid::new_v4();
    let booking_id =
        seed_active_ticket(&db, customer_id, flight_id, seat_id, dec!(1000000)).await;

    let err = booking_service(&db)
        .cancel_booking(customer_id, booking_id)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        ServiceError::BookingNotAllowed(BookingDenialReason::Departed)
    );

    // Seat not freed
    let seat = SeatEntity::find_by_id(seat_id)
        .one(&*db)
        .await
        .unwrap()
        .unwrap();
    assert!(!seat.is_available);
}

#[tokio::test]
async fn cancellation_enforces_ownership_and_existence() {
    let db = setup_db().await;
    let airplane_id = seed_airplane(&db).await;
    let flight_id = seed_flight(
        &db,
        airplane_id,
        departure_in_hours(5),
        dec!(1000000),
        FlightStatus::Scheduled,
    )
    .await;
    let seat_id = seed_seat(&db, airplane_id, "14A", SeatClass::Economy, true).await;

    let svc = booking_service(&db);
    let owner = Uuid::new_v4();
    let created = svc
        .create_booking(
            owner,
            CreateBookingRequest {
                flight_id,
                passengers: vec![passenger("A B", seat_id)],
            },
        )
        .await
        .unwrap();

    let err = svc
        .cancel_booking(Uuid::new_v4(), created.booking.booking_id)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Forbidden(_));

    let err = svc.cancel_booking(owner, Uuid::new_v4()).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn released_seat_can_be_booked_again() {
    let db = setup_db().await;
    let airplane_id = seed_airplane(&db).await;
    let flight_id = seed_flight(
        &db,
        airplane_id,
        departure_in_hours(5),
        dec!(1000000),
        FlightStatus::Scheduled,
    )
    .await;
    let seat_id = seed_seat(&db, airplane_id, "15A", SeatClass::Economy, true).await;

    let svc = booking_service(&db);
    let first_customer = Uuid::new_v4();
    let first = svc
        .create_booking(
            first_customer,
            CreateBookingRequest {
                flight_id,
                passengers: vec![passenger("A B", seat_id)],
            },
        )
        .await
        .unwrap();
    svc.cancel_booking(first_customer, first.booking.booking_id)
        .await
        .unwrap();

    // The unique slot freed by cancellation is claimable again
    svc.create_booking(
        Uuid::new_v4(),
        CreateBookingRequest {
            flight_id,
            passengers: vec![passenger("C D", seat_id)],
        },
    )
    .await
    .expect("seat released by cancellation should be bookable");
}
