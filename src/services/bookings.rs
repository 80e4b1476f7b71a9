//! Booking Transaction Service
//!
//! Validates, prices, and persists a booking with its tickets in a single
//! database transaction, flipping seat availability on the way through. The
//! availability flag is only a fast-path filter: the authoritative guard
//! against double-booking is the in-transaction re-check plus the unique
//! index on `tickets.active_seat_id`, which rejects the losing side of a race
//! at commit time.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::BookingPolicyConfig;
use crate::db::DbPool;
use crate::entities::booking::{
    self, ActiveModel as BookingActiveModel, BookingStatus, Entity as BookingEntity,
};
use crate::entities::flight::{Entity as FlightEntity, FlightStatus};
use crate::entities::seat::{self, Entity as SeatEntity, SeatClass};
use crate::entities::ticket::{self, ActiveModel as TicketActiveModel, Entity as TicketEntity};
use crate::errors::{BookingDenialReason, ServiceError};
use crate::events::{Event, EventSender};

const MAX_PASSENGER_NAME_LEN: usize = 100;
const MAX_PASSENGER_AGE_YEARS: i32 = 120;

/// One passenger in a booking request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerRequest {
    pub name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    pub seat_id: i64,
}

/// Request to book seats on a flight. Prices are never part of the request;
/// they are derived server-side from the seat class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub flight_id: i64,
    pub passengers: Vec<PassengerRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSummary {
    pub booking_id: Uuid,
    pub total_price: Decimal,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketSummary {
    pub ticket_id: Uuid,
    pub passenger_name: String,
    pub seat_id: i64,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightInfo {
    pub flight_number: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

/// Response for a committed booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking: BookingSummary,
    pub tickets: Vec<TicketSummary>,
    pub flight_info: FlightInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingSummary>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// A passenger entry after name normalization and field validation.
#[derive(Debug, Clone)]
struct ValidatedPassenger {
    name: String,
    date_of_birth: Option<NaiveDate>,
    seat_id: i64,
}

/// Service owning the booking and cancellation transactions.
#[derive(Clone)]
pub struct BookingService {
    db_pool: Arc<DbPool>,
    policy: BookingPolicyConfig,
    event_sender: Option<Arc<EventSender>>,
}

impl BookingService {
    pub fn new(
        db_pool: Arc<DbPool>,
        policy: BookingPolicyConfig,
        event_sender: Option<Arc<EventSender>>,
    ) -> Self {
        Self {
            db_pool,
            policy,
            event_sender,
        }
    }

    /// Creates a booking for `customer_id`, atomically claiming every
    /// requested seat or failing with no effect.
    #[instrument(skip(self, request), fields(customer_id = %customer_id, flight_id = request.flight_id))]
    pub async fn create_booking(
        &self,
        customer_id: Uuid,
        request: CreateBookingRequest,
    ) -> Result<BookingResponse, ServiceError> {
        let passengers = self.validate_request(&request)?;

        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for booking creation");
            ServiceError::DatabaseError(e)
        })?;

        let result = self
            .create_booking_in_txn(&txn, customer_id, request.flight_id, &passengers)
            .await;

        match result {
            Ok(response) => {
                txn.commit().await.map_err(|e| {
                    error!(error = %e, "Failed to commit booking creation transaction");
                    ServiceError::DatabaseError(e)
                })?;

                info!(
                    booking_id = %response.booking.booking_id,
                    total_price = %response.booking.total_price,
                    "Booking created successfully"
                );

                if let Some(event_sender) = &self.event_sender {
                    let event = Event::BookingCreated {
                        booking_id: response.booking.booking_id,
                        customer_id,
                        flight_id: request.flight_id,
                        total_price: response.booking.total_price,
                        seat_ids: response.tickets.iter().map(|t| t.seat_id).collect(),
                    };
                    if let Err(e) = event_sender.send(event).await {
                        warn!(error = %e, "Failed to send booking created event");
                    }
                }

                Ok(response)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    error!(error = %rollback_err, "Failed to roll back booking transaction");
                }
                Err(err)
            }
        }
    }

    /// Validation steps that need no store access: request shape, passenger
    /// fields, duplicate seats. First failure wins.
    fn validate_request(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<Vec<ValidatedPassenger>, ServiceError> {
        if request.flight_id <= 0 {
            return Err(ServiceError::ValidationError(
                "flight_id must be a positive integer".to_string(),
            ));
        }
        if request.passengers.is_empty() {
            return Err(ServiceError::ValidationError(
                "At least one passenger is required".to_string(),
            ));
        }
        let cap = self.policy.max_passengers_per_booking;
        if request.passengers.len() > cap {
            return Err(ServiceError::ValidationError(format!(
                "A booking may hold at most {} passengers",
                cap
            )));
        }

        let today = Utc::now().date_naive();
        let oldest_plausible_dob = today
            .with_year(today.year() - MAX_PASSENGER_AGE_YEARS)
            .unwrap_or(NaiveDate::MIN);

        let mut validated = Vec::with_capacity(request.passengers.len());
        for (index, passenger) in request.passengers.iter().enumerate() {
            let name = normalize_passenger_name(&passenger.name);
            if name.is_empty() {
                return Err(ServiceError::ValidationError(format!(
                    "Passenger {}: name must not be empty",
                    index + 1
                )));
            }
            if name.chars().count() > MAX_PASSENGER_NAME_LEN {
                return Err(ServiceError::ValidationError(format!(
                    "Passenger {}: name must be at most {} characters",
                    index + 1,
                    MAX_PASSENGER_NAME_LEN
                )));
            }
            if passenger.seat_id <= 0 {
                return Err(ServiceError::ValidationError(format!(
                    "Passenger {}: seat_id must be a positive integer",
                    index + 1
                )));
            }
            if let Some(dob) = passenger.date_of_birth {
                if dob > today {
                    return Err(ServiceError::ValidationError(format!(
                        "Passenger {}: date of birth must not be in the future",
                        index + 1
                    )));
                }
                if dob < oldest_plausible_dob {
                    return Err(ServiceError::ValidationError(format!(
                        "Passenger {}: date of birth must be within the last {} years",
                        index + 1,
                        MAX_PASSENGER_AGE_YEARS
                    )));
                }
            }
            validated.push(ValidatedPassenger {
                name,
                date_of_birth: passenger.date_of_birth,
                seat_id: passenger.seat_id,
            });
        }

        let mut seen = HashSet::with_capacity(validated.len());
        let mut duplicates: Vec<i64> = Vec::new();
        for passenger in &validated {
            if !seen.insert(passenger.seat_id) && !duplicates.contains(&passenger.seat_id) {
                duplicates.push(passenger.seat_id);
            }
        }
        if !duplicates.is_empty() {
            return Err(ServiceError::ValidationError(format!(
                "Duplicate seat ids in request: {:?}",
                duplicates
            )));
        }

        Ok(validated)
    }

    /// The store-backed half of the pipeline. Runs entirely on `txn`; any
    /// error propagated from here causes a full rollback in the caller.
    async fn create_booking_in_txn(
        &self,
        txn: &DatabaseTransaction,
        customer_id: Uuid,
        flight_id: i64,
        passengers: &[ValidatedPassenger],
    ) -> Result<BookingResponse, ServiceError> {
        let flight = FlightEntity::find_by_id(flight_id)
            .one(txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Flight {} not found", flight_id)))?;

        if FlightStatus::from_str(&flight.status) == Some(FlightStatus::Cancelled) {
            return Err(ServiceError::BookingNotAllowed(
                BookingDenialReason::FlightCancelled,
            ));
        }

        // Booking window: both comparisons are inclusive, so a request landing
        // exactly on the cutoff instant is rejected.
        let now = Utc::now();
        if now >= flight.departure_time {
            return Err(ServiceError::BookingNotAllowed(BookingDenialReason::Departed));
        }
        let cutoff = flight.departure_time - Duration::hours(self.policy.booking_cutoff_hours);
        if now >= cutoff {
            return Err(ServiceError::BookingNotAllowed(
                BookingDenialReason::TooCloseToDeparture,
            ));
        }

        let requested_seat_ids: Vec<i64> = passengers.iter().map(|p| p.seat_id).collect();

        // Optimistic availability filter. Seats must exist, sit on this
        // flight's airplane, and currently be flagged available; any shortfall
        // fails the whole batch.
        let seats = SeatEntity::find()
            .filter(seat::Column::Id.is_in(requested_seat_ids.clone()))
            .filter(seat::Column::AirplaneId.eq(flight.airplane_id))
            .filter(seat::Column::IsAvailable.eq(true))
            .all(txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if seats.len() < requested_seat_ids.len() {
            let found: HashSet<i64> = seats.iter().map(|s| s.id).collect();
            let missing: Vec<i64> = requested_seat_ids
                .iter()
                .copied()
                .filter(|id| !found.contains(id))
                .collect();
            return Err(ServiceError::SeatsUnavailable { seat_ids: missing });
        }

        // Authoritative re-check inside the transaction: a live ticket row is
        // one whose active_seat_id is still set, regardless of what the
        // availability flag claimed a moment ago.
        let conflicting: Vec<i64> = TicketEntity::find()
            .filter(ticket::Column::ActiveSeatId.is_in(requested_seat_ids.clone()))
            .all(txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .filter_map(|t| t.active_seat_id)
            .collect();

        if !conflicting.is_empty() {
            return Err(ServiceError::SeatConflict {
                seat_ids: conflicting,
            });
        }

        // Price from validated seat class; client-submitted prices do not exist
        // in the request shape at all.
        let mut tickets_to_insert = Vec::with_capacity(passengers.len());
        let mut total_price = Decimal::ZERO;
        for passenger in passengers {
            let seat = seats
                .iter()
                .find(|s| s.id == passenger.seat_id)
                .ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "Seat {} missing from availability result",
                        passenger.seat_id
                    ))
                })?;
            let class = SeatClass::from_str(&seat.class).ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "Seat {} has unrecognized class '{}'",
                    seat.id, seat.class
                ))
            })?;
            let price = ticket_price(
                flight.base_price,
                self.policy.class_multipliers.for_class(class),
            );
            total_price += price;
            tickets_to_insert.push((passenger, price));
        }

        let booking_id = Uuid::new_v4();
        let booking_model = BookingActiveModel {
            id: Set(booking_id),
            customer_id: Set(customer_id),
            flight_id: Set(flight_id),
            status: Set(BookingStatus::Booked.as_str().to_string()),
            total_price: Set(total_price),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(txn)
        .await
        .map_err(|e| {
            error!(error = %e, booking_id = %booking_id, "Failed to insert booking row");
            ServiceError::DatabaseError(e)
        })?;

        let mut ticket_summaries = Vec::with_capacity(tickets_to_insert.len());
        for (passenger, price) in tickets_to_insert {
            let ticket_id = Uuid::new_v4();
            let insert_result = TicketActiveModel {
                id: Set(ticket_id),
                booking_id: Set(booking_id),
                seat_id: Set(passenger.seat_id),
                active_seat_id: Set(Some(passenger.seat_id)),
                passenger_name: Set(passenger.name.clone()),
                passenger_dob: Set(passenger.date_of_birth),
                price: Set(price),
                created_at: Set(now),
            }
            .insert(txn)
            .await;

            match insert_result {
                Ok(_) => ticket_summaries.push(TicketSummary {
                    ticket_id,
                    passenger_name: passenger.name.clone(),
                    seat_id: passenger.seat_id,
                    price,
                }),
                // The unique index on active_seat_id fired: a concurrent
                // booking committed this seat between our re-check and now.
                Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    warn!(
                        seat_id = passenger.seat_id,
                        "Seat claimed by a concurrent booking at insert time"
                    );
                    return Err(ServiceError::SeatConflict {
                        seat_ids: vec![passenger.seat_id],
                    });
                }
                Err(e) => {
                    error!(error = %e, booking_id = %booking_id, "Failed to insert ticket row");
                    return Err(ServiceError::DatabaseError(e));
                }
            }
        }

        SeatEntity::update_many()
            .col_expr(seat::Column::IsAvailable, Expr::value(false))
            .col_expr(seat::Column::UpdatedAt, Expr::value(Some(now)))
            .filter(seat::Column::Id.is_in(requested_seat_ids))
            .exec(txn)
            .await
            .map_err(|e| {
                error!(error = %e, booking_id = %booking_id, "Failed to flip seat availability");
                ServiceError::DatabaseError(e)
            })?;

        Ok(BookingResponse {
            booking: BookingSummary {
                booking_id,
                total_price: booking_model.total_price,
                status: booking_model.status,
            },
            tickets: ticket_summaries,
            flight_info: FlightInfo {
                flight_number: flight.flight_number,
                departure_time: flight.departure_time,
                arrival_time: flight.arrival_time,
            },
        })
    }

    /// Cancels a booking, releasing every seat its tickets hold. The same
    /// transactional discipline as creation: this is the only other writer of
    /// the seat availability flag.
    #[instrument(skip(self), fields(customer_id = %customer_id, booking_id = %booking_id))]
    pub async fn cancel_booking(
        &self,
        customer_id: Uuid,
        booking_id: Uuid,
    ) -> Result<BookingSummary, ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for booking cancellation");
            ServiceError::DatabaseError(e)
        })?;

        let result = self
            .cancel_booking_in_txn(&txn, customer_id, booking_id)
            .await;

        match result {
            Ok((summary, flight_id, released_seat_ids)) => {
                txn.commit().await.map_err(|e| {
                    error!(error = %e, booking_id = %booking_id, "Failed to commit cancellation");
                    ServiceError::DatabaseError(e)
                })?;

                info!(
                    booking_id = %booking_id,
                    released = released_seat_ids.len(),
                    "Booking cancelled"
                );

                if let Some(event_sender) = &self.event_sender {
                    let event = Event::BookingCancelled {
                        booking_id,
                        customer_id,
                        flight_id,
                        released_seat_ids,
                    };
                    if let Err(e) = event_sender.send(event).await {
                        warn!(error = %e, "Failed to send booking cancelled event");
                    }
                }

                Ok(summary)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    error!(error = %rollback_err, "Failed to roll back cancellation transaction");
                }
                Err(err)
            }
        }
    }

    async fn cancel_booking_in_txn(
        &self,
        txn: &DatabaseTransaction,
        customer_id: Uuid,
        booking_id: Uuid,
    ) -> Result<(BookingSummary, i64, Vec<i64>), ServiceError> {
        let booking = BookingEntity::find_by_id(booking_id)
            .one(txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Booking {} not found", booking_id)))?;

        if booking.customer_id != customer_id {
            return Err(ServiceError::Forbidden(
                "Booking belongs to another customer".to_string(),
            ));
        }

        if BookingStatus::from_str(&booking.status) == Some(BookingStatus::Cancelled) {
            return Err(ServiceError::BookingNotAllowed(
                BookingDenialReason::AlreadyCancelled,
            ));
        }

        let flight = FlightEntity::find_by_id(booking.flight_id)
            .one(txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "Booking {} references missing flight {}",
                    booking_id, booking.flight_id
                ))
            })?;

        let now = Utc::now();
        if now >= flight.departure_time {
            return Err(ServiceError::BookingNotAllowed(BookingDenialReason::Departed));
        }

        let tickets = TicketEntity::find()
            .filter(ticket::Column::BookingId.eq(booking_id))
            .all(txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let seat_ids: Vec<i64> = tickets.iter().map(|t| t.seat_id).collect();

        let flight_id = booking.flight_id;
        let mut booking_model: BookingActiveModel = booking.into();
        booking_model.status = Set(BookingStatus::Cancelled.as_str().to_string());
        booking_model.updated_at = Set(Some(now));
        let updated = booking_model
            .update(txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        // Drop the live-seat markers first; the unique index slot frees in the
        // same transaction that releases the availability flag.
        TicketEntity::update_many()
            .col_expr(
                ticket::Column::ActiveSeatId,
                Expr::value(Option::<i64>::None),
            )
            .filter(ticket::Column::BookingId.eq(booking_id))
            .exec(txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if !seat_ids.is_empty() {
            SeatEntity::update_many()
                .col_expr(seat::Column::IsAvailable, Expr::value(true))
                .col_expr(seat::Column::UpdatedAt, Expr::value(Some(now)))
                .filter(seat::Column::Id.is_in(seat_ids.clone()))
                .exec(txn)
                .await
                .map_err(ServiceError::DatabaseError)?;
        }

        Ok((
            BookingSummary {
                booking_id: updated.id,
                total_price: updated.total_price,
                status: updated.status,
            },
            flight_id,
            seat_ids,
        ))
    }

    /// Retrieves a booking with its tickets and flight summary.
    #[instrument(skip(self), fields(booking_id = %booking_id))]
    pub async fn get_booking(
        &self,
        customer_id: Uuid,
        booking_id: Uuid,
    ) -> Result<BookingResponse, ServiceError> {
        let db = &*self.db_pool;

        let booking = BookingEntity::find_by_id(booking_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Booking {} not found", booking_id)))?;

        if booking.customer_id != customer_id {
            return Err(ServiceError::Forbidden(
                "Booking belongs to another customer".to_string(),
            ));
        }

        let tickets = TicketEntity::find()
            .filter(ticket::Column::BookingId.eq(booking_id))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let flight = FlightEntity::find_by_id(booking.flight_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "Booking {} references missing flight {}",
                    booking_id, booking.flight_id
                ))
            })?;

        Ok(BookingResponse {
            booking: BookingSummary {
                booking_id: booking.id,
                total_price: booking.total_price,
                status: booking.status,
            },
            tickets: tickets
                .into_iter()
                .map(|t| TicketSummary {
                    ticket_id: t.id,
                    passenger_name: t.passenger_name,
                    seat_id: t.seat_id,
                    price: t.price,
                })
                .collect(),
            flight_info: FlightInfo {
                flight_number: flight.flight_number,
                departure_time: flight.departure_time,
                arrival_time: flight.arrival_time,
            },
        })
    }

    /// Lists the caller's bookings, newest first.
    #[instrument(skip(self))]
    pub async fn list_bookings(
        &self,
        customer_id: Uuid,
        page: u64,
        per_page: u64,
    ) -> Result<BookingListResponse, ServiceError> {
        if page == 0 {
            return Err(ServiceError::ValidationError(
                "Page number must be greater than 0".to_string(),
            ));
        }
        if per_page == 0 || per_page > 100 {
            return Err(ServiceError::ValidationError(
                "Page size must be between 1 and 100".to_string(),
            ));
        }

        let db = &*self.db_pool;

        let paginator = BookingEntity::find()
            .filter(booking::Column::CustomerId.eq(customer_id))
            .order_by_desc(booking::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;

        let bookings = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(BookingListResponse {
            bookings: bookings
                .into_iter()
                .map(|b| BookingSummary {
                    booking_id: b.id,
                    total_price: b.total_price,
                    status: b.status,
                })
                .collect(),
            total,
            page,
            per_page,
        })
    }
}

/// Collapses internal whitespace runs to single spaces and trims the ends.
fn normalize_passenger_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fare for one seat: base price times class multiplier, rounded to the
/// nearest whole currency unit (midpoint away from zero).
fn ticket_price(base_price: Decimal, multiplier: Decimal) -> Decimal {
    (base_price * multiplier).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn policy() -> BookingPolicyConfig {
        BookingPolicyConfig::default()
    }

    fn service() -> BookingService {
        let db = Arc::new(sea_orm::DatabaseConnection::Disconnected);
        BookingService::new(db, policy(), None)
    }

    fn passenger(name: &str, seat_id: i64) -> PassengerRequest {
        PassengerRequest {
            name: name.to_string(),
            date_of_birth: None,
            seat_id,
        }
    }

    #[test]
    fn name_normalization_collapses_whitespace() {
        assert_eq!(
            normalize_passenger_name("  Nguyen   Van\tA  "),
            "Nguyen Van A"
        );
        assert_eq!(normalize_passenger_name("   "), "");
    }

    #[rstest::rstest]
    #[case(dec!(1000000), dec!(1.0), dec!(1000000))]
    #[case(dec!(1000000), dec!(2.5), dec!(2500000))]
    #[case(dec!(1000000), dec!(5.0), dec!(5000000))]
    #[case(dec!(999.99), dec!(1.0), dec!(1000))]
    #[case(dec!(101), dec!(2.5), dec!(253))] // 252.5 rounds away from zero
    fn pricing_follows_class_multipliers_and_rounds(
        #[case] base: Decimal,
        #[case] multiplier: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(ticket_price(base, multiplier), expected);
    }

    #[test]
    fn rejects_non_positive_flight_id() {
        let err = service()
            .validate_request(&CreateBookingRequest {
                flight_id: 0,
                passengers: vec![passenger("A B", 1)],
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn rejects_empty_passenger_list() {
        let err = service()
            .validate_request(&CreateBookingRequest {
                flight_id: 1,
                passengers: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn rejects_more_passengers_than_the_cap() {
        let passengers = (1..=10).map(|i| passenger("A B", i)).collect();
        let err = service()
            .validate_request(&CreateBookingRequest {
                flight_id: 1,
                passengers,
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn rejects_blank_and_oversized_names() {
        let err = service()
            .validate_request(&CreateBookingRequest {
                flight_id: 1,
                passengers: vec![passenger("   ", 1)],
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));

        let long_name = "x".repeat(101);
        let err = service()
            .validate_request(&CreateBookingRequest {
                flight_id: 1,
                passengers: vec![passenger(&long_name, 1)],
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn accepts_a_name_of_exactly_100_chars() {
        let name = "x".repeat(100);
        let validated = service()
            .validate_request(&CreateBookingRequest {
                flight_id: 1,
                passengers: vec![passenger(&name, 1)],
            })
            .unwrap();
        assert_eq!(validated[0].name.chars().count(), 100);
    }

    #[test]
    fn rejects_future_and_implausibly_old_dobs() {
        let today = Utc::now().date_naive();

        let mut future = passenger("A B", 1);
        future.date_of_birth = Some(today + Duration::days(1));
        let err = service()
            .validate_request(&CreateBookingRequest {
                flight_id: 1,
                passengers: vec![future],
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));

        let mut ancient = passenger("A B", 1);
        ancient.date_of_birth = Some(
            today
                .with_year(today.year() - 121)
                .expect("valid historic date"),
        );
        let err = service()
            .validate_request(&CreateBookingRequest {
                flight_id: 1,
                passengers: vec![ancient],
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn accepts_a_plausible_dob() {
        let mut p = passenger("A B", 1);
        p.date_of_birth = Some(NaiveDate::from_ymd_opt(1990, 5, 17).unwrap());
        assert!(service()
            .validate_request(&CreateBookingRequest {
                flight_id: 1,
                passengers: vec![p],
            })
            .is_ok());
    }

    #[test]
    fn rejects_duplicate_seats_before_any_store_access() {
        let err = service()
            .validate_request(&CreateBookingRequest {
                flight_id: 1,
                passengers: vec![passenger("A B", 7), passenger("C D", 7)],
            })
            .unwrap_err();
        match err {
            ServiceError::ValidationError(msg) => assert!(msg.contains('7')),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn normalizes_names_in_the_validated_output() {
        let validated = service()
            .validate_request(&CreateBookingRequest {
                flight_id: 1,
                passengers: vec![passenger("  Nguyen   Van A ", 3)],
            })
            .unwrap();
        assert_eq!(validated[0].name, "Nguyen Van A");
    }
}
