use crate::model::{
    id::{BookingId, RatingId},
    rating::{event::CreateRating, Rating},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait RatingRepository: Send + Sync {
    // 予約者本人が、終了済みの予約に対してのみ評価できる
    async fn create(&self, event: CreateRating) -> AppResult<RatingId>;
    // 新しい順
    async fn find_by_booking_id(&self, booking_id: BookingId) -> AppResult<Vec<Rating>>;
    // 削除件数を返す
    async fn delete_all(&self) -> AppResult<u64>;
}
