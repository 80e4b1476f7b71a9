pub mod airplane;
pub mod booking;
pub mod flight;
pub mod seat;
pub mod ticket;
