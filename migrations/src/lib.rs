pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_airplanes_table;
mod m20240301_000002_create_flights_table;
mod m20240301_000003_create_seats_table;
mod m20240301_000004_create_bookings_table;
mod m20240301_000005_create_tickets_table;
mod m20240610_000006_add_booking_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_airplanes_table::Migration),
            Box::new(m20240301_000002_create_flights_table::Migration),
            Box::new(m20240301_000003_create_seats_table::Migration),
            Box::new(m20240301_000004_create_bookings_table::Migration),
            Box::new(m20240301_000005_create_tickets_table::Migration),
            Box::new(m20240610_000006_add_booking_indexes::Migration),
        ]
    }
}
