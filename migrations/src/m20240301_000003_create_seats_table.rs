use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Seats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Seats::Id)
                            .big_integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Seats::AirplaneId).big_integer().not_null())
                    .col(ColumnDef::new(Seats::SeatNumber).string().not_null())
                    .col(
                        ColumnDef::new(Seats::Class)
                            .string()
                            .not_null()
                            .default("economy"),
                    )
                    .col(
                        ColumnDef::new(Seats::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Seats::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Seats::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seats_airplane_id")
                            .from(Seats::Table, Seats::AirplaneId)
                            .to(
                                super::m20240301_000001_create_airplanes_table::Airplanes::Table,
                                super::m20240301_000001_create_airplanes_table::Airplanes::Id,
                            )
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One physical seat per airplane cabin position
        manager
            .create_index(
                Index::create()
                    .name("idx_seats_airplane_seat_number")
                    .table(Seats::Table)
                    .col(Seats::AirplaneId)
                    .col(Seats::SeatNumber)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Seats::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Seats {
    Table,
    Id,
    AirplaneId,
    SeatNumber,
    Class,
    IsAvailable,
    CreatedAt,
    UpdatedAt,
}
