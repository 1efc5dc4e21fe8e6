use crate::model::id::{BookingId, UserId};
use chrono::{DateTime, Utc};
use derive_new::new;

#[derive(new)]
pub struct CreateRating {
    pub booking_id: BookingId,
    pub rated_by: UserId,
    pub score: i32,
    pub comment: Option<String>,
    pub rated_at: DateTime<Utc>,
}
