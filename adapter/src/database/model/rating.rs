use kernel::model::{
    id::{BookingId, RatingId},
    rating::Rating,
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct RatingRow {
    pub rating_id: RatingId,
    pub booking_id: BookingId,
    pub score: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<RatingRow> for Rating {
    fn from(value: RatingRow) -> Self {
        let RatingRow {
            rating_id,
            booking_id,
            score,
            comment,
            created_at,
        } = value;
        Rating {
            rating_id,
            booking_id,
            score,
            comment,
            created_at,
        }
    }
}
