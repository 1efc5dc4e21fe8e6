use crate::model::id::{BookingId, RatingId};
use chrono::{DateTime, Utc};

pub mod event;

#[derive(Debug, Clone)]
pub struct Rating {
    pub rating_id: RatingId,
    pub booking_id: BookingId,
    pub score: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
