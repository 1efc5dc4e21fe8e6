use kernel::model::{
    booking::{Booking, BookingRoom, BookingStatus, BookingUser},
    id::{BookingId, RoomId, UserId},
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};
use std::str::FromStr;

// 予約一覧・詳細の取得に使う型。rooms と users を JOIN した結果を受ける
#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub booking_reference: String,
    pub room_id: RoomId,
    pub room_name: String,
    pub user_id: UserId,
    pub user_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(value: BookingRow) -> Result<Self, Self::Error> {
        let BookingRow {
            booking_id,
            booking_reference,
            room_id,
            room_name,
            user_id,
            user_name,
            start_time,
            end_time,
            status,
            created_at,
            cancelled_at,
        } = value;
        let status = BookingStatus::from_str(&status).map_err(|e| {
            AppError::ConversionEntityError(format!("unknown booking status {status}: {e}"))
        })?;
        Ok(Booking {
            booking_id,
            reference: booking_reference,
            booked_by: BookingUser { user_id, user_name },
            room: BookingRoom { room_id, room_name },
            start_time,
            end_time,
            status,
            created_at,
            cancelled_at,
        })
    }
}
