use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Airplanes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Airplanes::Id)
                            .big_integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Airplanes::Model).string().not_null())
                    .col(
                        ColumnDef::new(Airplanes::Registration)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Airplanes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Airplanes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Airplanes {
    Table,
    Id,
    Model,
    Registration,
    CreatedAt,
}
