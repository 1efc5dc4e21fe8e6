pub mod booking;
pub mod rating;
pub mod room;
pub mod user;
