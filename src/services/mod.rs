// Core services
pub mod bookings;
pub mod flights;
pub mod seats;
