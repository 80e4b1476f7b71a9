use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tickets::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Tickets::BookingId).uuid().not_null())
                    .col(ColumnDef::new(Tickets::SeatId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Tickets::ActiveSeatId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Tickets::PassengerName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Tickets::PassengerDob).date().null())
                    .col(
                        ColumnDef::new(Tickets::Price)
                            .decimal_len(12, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Tickets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_booking_id")
                            .from(Tickets::Table, Tickets::BookingId)
                            .to(
                                super::m20240301_000004_create_bookings_table::Bookings::Table,
                                super::m20240301_000004_create_bookings_table::Bookings::Id,
                            )
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_seat_id")
                            .from(Tickets::Table, Tickets::SeatId)
                            .to(
                                super::m20240301_000003_create_seats_table::Seats::Table,
                                super::m20240301_000003_create_seats_table::Seats::Id,
                            )
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // active_seat_id mirrors seat_id while the owning booking is live and
        // is nulled out on cancellation. The unique index (NULLs exempt on
        // Postgres and SQLite alike) is the durable arbiter of the
        // one-active-ticket-per-seat invariant: a racing insert that survives
        // the application re-check still loses here at commit.
        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_active_seat_id")
                    .table(Tickets::Table)
                    .col(Tickets::ActiveSeatId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Tickets {
    Table,
    Id,
    BookingId,
    SeatId,
    ActiveSeatId,
    PassengerName,
    PassengerDob,
    Price,
    CreatedAt,
}
