use crate::model::{
    booking::interval::TimeInterval,
    id::RoomId,
    room::{event::CreateRoom, Room},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, event: CreateRoom) -> AppResult<RoomId>;
    // 部屋名の昇順
    async fn find_all(&self) -> AppResult<Vec<Room>>;
    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Option<Room>>;
    // 指定区間に有効な予約が一件も重ならない部屋
    async fn find_available(&self, interval: TimeInterval) -> AppResult<Vec<Room>>;
}
