use super::interval::TimeInterval;
use crate::model::id::{BookingId, RoomId, UserId};
use chrono::{DateTime, Utc};
use derive_new::new;

#[derive(new)]
pub struct CreateBooking {
    pub room_id: RoomId,
    pub booked_by: UserId,
    pub interval: TimeInterval,
    pub booked_at: DateTime<Utc>,
}

#[derive(new)]
pub struct CancelBooking {
    pub booking_id: BookingId,
    pub requested_user: UserId,
    pub cancelled_at: DateTime<Utc>,
}
