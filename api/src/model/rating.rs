use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{BookingId, RatingId, UserId},
    rating::{event::CreateRating, Rating},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRatingRequest {
    #[garde(range(min = 1, max = 5))]
    pub score: i32,
    #[garde(length(chars, max = 1000))]
    pub comment: Option<String>,
}

#[derive(new)]
pub struct CreateRatingRequestWithIds(BookingId, UserId, DateTime<Utc>, CreateRatingRequest);

impl From<CreateRatingRequestWithIds> for CreateRating {
    fn from(value: CreateRatingRequestWithIds) -> Self {
        let CreateRatingRequestWithIds(
            booking_id,
            rated_by,
            rated_at,
            CreateRatingRequest { score, comment },
        ) = value;
        // 空白だけのコメントは無しとして扱う
        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        CreateRating::new(booking_id, rated_by, score, comment, rated_at)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub rating_id: RatingId,
    pub booking_id: BookingId,
    pub score: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Rating> for RatingResponse {
    fn from(value: Rating) -> Self {
        let Rating {
            rating_id,
            booking_id,
            score,
            comment,
            created_at,
        } = value;
        Self {
            rating_id,
            booking_id,
            score,
            comment,
            created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingsResponse {
    pub items: Vec<RatingResponse>,
}

impl From<Vec<Rating>> for RatingsResponse {
    fn from(value: Vec<Rating>) -> Self {
        Self {
            items: value.into_iter().map(RatingResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingCreatedResponse {
    pub rating_id: RatingId,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearRatingsResponse {
    pub deleted_count: u64,
}
