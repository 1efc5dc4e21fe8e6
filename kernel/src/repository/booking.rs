use crate::model::{
    booking::{
        event::{CancelBooking, CreateBooking},
        interval::TimeInterval,
        Booking, BookingScope,
    },
    id::{BookingId, RoomId, UserId},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::AppResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    // 空き確認と登録を一つの操作として行う。重複時は AppError::Conflict
    async fn create(&self, event: CreateBooking) -> AppResult<Booking>;
    // 読み取りのみ。ストレージ障害は「空いている」ではなくエラーとして返す
    async fn is_available(&self, room_id: RoomId, interval: TimeInterval) -> AppResult<bool>;
    // 予約者本人のみ、ACTIVE の間だけキャンセルできる
    async fn cancel(&self, event: CancelBooking) -> AppResult<()>;
    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;
    // 開始時刻の降順
    async fn find_by_user_id(
        &self,
        user_id: UserId,
        scope: BookingScope,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>>;
    // 開始時刻の降順で最大 limit 件
    async fn find_recent(&self, limit: i64) -> AppResult<Vec<Booking>>;
}
