use sea_orm_migration::prelude::*;

use super::m20240301_000002_create_flights_table::Flights;
use super::m20240301_000003_create_seats_table::Seats;
use super::m20240301_000004_create_bookings_table::Bookings;
use super::m20240301_000005_create_tickets_table::Tickets;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Foreign key index for ticket lookups by booking (joins on every
        // booking read and on cancellation)
        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_booking_id")
                    .table(Tickets::Table)
                    .col(Tickets::BookingId)
                    .to_owned(),
            )
            .await?;

        // Seat history lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_seat_id")
                    .table(Tickets::Table)
                    .col(Tickets::SeatId)
                    .to_owned(),
            )
            .await?;

        // Customer booking listings filtered by status
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_customer_status")
                    .table(Bookings::Table)
                    .col(Bookings::CustomerId)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        // Availability scans per airplane
        manager
            .create_index(
                Index::create()
                    .name("idx_seats_airplane_available")
                    .table(Seats::Table)
                    .col(Seats::AirplaneId)
                    .col(Seats::IsAvailable)
                    .to_owned(),
            )
            .await?;

        // Departure-window queries
        manager
            .create_index(
                Index::create()
                    .name("idx_flights_departure_time")
                    .table(Flights::Table)
                    .col(Flights::DepartureTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_tickets_booking_id",
            "idx_tickets_seat_id",
            "idx_bookings_customer_status",
            "idx_seats_airplane_available",
            "idx_flights_departure_time",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}
