use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    booking::{reference, Booking, BookingRoom, BookingScope, BookingStatus, BookingUser},
    id::{BookingId, RoomId, UserId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[garde(skip)]
    pub room_id: RoomId,
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[garde(skip)]
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingScopeName {
    Current,
    Past,
    #[default]
    All,
}

impl From<BookingScopeName> for BookingScope {
    fn from(value: BookingScopeName) -> Self {
        match value {
            BookingScopeName::Current => Self::Current,
            BookingScopeName::Past => Self::Past,
            BookingScopeName::All => Self::All,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BookingListQuery {
    #[serde(default)]
    pub status: BookingScopeName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatusName {
    Active,
    Cancelled,
    Completed,
}

impl From<BookingStatus> for BookingStatusName {
    fn from(value: BookingStatus) -> Self {
        match value {
            BookingStatus::Active => Self::Active,
            BookingStatus::Cancelled => Self::Cancelled,
            BookingStatus::Completed => Self::Completed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub reference: String,
    pub reference_display: String,
    pub booked_by: BookingUserResponse,
    pub room: BookingRoomResponse,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatusName,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl BookingResponse {
    // 状態は保存値ではなく now 時点の実効値を返す
    pub fn at(value: Booking, now: DateTime<Utc>) -> Self {
        let status = value.effective_status(now).into();
        let Booking {
            booking_id,
            reference,
            booked_by,
            room,
            start_time,
            end_time,
            created_at,
            cancelled_at,
            ..
        } = value;
        Self {
            booking_id,
            reference_display: reference::format_for_display(&reference),
            reference,
            booked_by: booked_by.into(),
            room: room.into(),
            start_time,
            end_time,
            status,
            created_at,
            cancelled_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUserResponse {
    pub user_id: UserId,
    pub user_name: String,
}

impl From<BookingUser> for BookingUserResponse {
    fn from(value: BookingUser) -> Self {
        let BookingUser { user_id, user_name } = value;
        Self { user_id, user_name }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRoomResponse {
    pub room_id: RoomId,
    pub room_name: String,
}

impl From<BookingRoom> for BookingRoomResponse {
    fn from(value: BookingRoom) -> Self {
        let BookingRoom { room_id, room_name } = value;
        Self { room_id, room_name }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub items: Vec<BookingResponse>,
}

impl BookingsResponse {
    pub fn at(value: Vec<Booking>, now: DateTime<Utc>) -> Self {
        Self {
            items: value
                .into_iter()
                .map(|b| BookingResponse::at(b, now))
                .collect(),
        }
    }
}
