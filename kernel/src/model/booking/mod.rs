use crate::model::id::{BookingId, RoomId, UserId};
use chrono::{DateTime, Utc};
use shared::error::{AppError, AppResult};
use strum::{AsRefStr, Display, EnumString};

pub mod event;
pub mod interval;
pub mod reference;

use interval::TimeInterval;

/// データベースに保存されるのは `Active` と `Cancelled` のみ。
/// `Completed` は終了時刻を過ぎた `Active` から都度導出する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Active,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn derive(stored: BookingStatus, end_time: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        match stored {
            BookingStatus::Active if end_time <= now => BookingStatus::Completed,
            other => other,
        }
    }
}

/// 利用者の予約一覧を絞り込む条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum BookingScope {
    Current,
    Past,
    #[default]
    All,
}

#[derive(Debug, Clone)]
pub struct Booking {
    pub booking_id: BookingId,
    pub reference: String,
    pub booked_by: BookingUser,
    pub room: BookingRoom,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn effective_status(&self, now: DateTime<Utc>) -> BookingStatus {
        BookingStatus::derive(self.status, self.end_time, now)
    }

    /// 保存時に start < end が保証されているので区間は常に作れる
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::from_stored(self.start_time, self.end_time)
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.booked_by.user_id == user_id
    }

    pub fn ensure_cancellable_by(&self, user_id: UserId, now: DateTime<Utc>) -> AppResult<()> {
        if !self.is_owned_by(user_id) {
            return Err(AppError::ForbiddenOperation);
        }
        match self.effective_status(now) {
            BookingStatus::Active => Ok(()),
            BookingStatus::Cancelled => Err(AppError::UnprocessableEntity(format!(
                "booking ({}) is already cancelled",
                self.booking_id
            ))),
            BookingStatus::Completed => Err(AppError::UnprocessableEntity(format!(
                "booking ({}) has already ended",
                self.booking_id
            ))),
        }
    }

    pub fn ensure_ratable_by(&self, user_id: UserId, now: DateTime<Utc>) -> AppResult<()> {
        if !self.is_owned_by(user_id) {
            return Err(AppError::ForbiddenOperation);
        }
        match self.effective_status(now) {
            BookingStatus::Completed => Ok(()),
            BookingStatus::Cancelled => Err(AppError::UnprocessableEntity(format!(
                "booking ({}) was cancelled and cannot be rated",
                self.booking_id
            ))),
            BookingStatus::Active => Err(AppError::UnprocessableEntity(format!(
                "booking ({}) can be rated once it has ended",
                self.booking_id
            ))),
        }
    }

    pub fn matches_scope(&self, scope: BookingScope, now: DateTime<Utc>) -> bool {
        match scope {
            BookingScope::All => true,
            BookingScope::Current => self.status == BookingStatus::Active && self.end_time > now,
            BookingScope::Past => self.end_time <= now,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingUser {
    pub user_id: UserId,
    pub user_name: String,
}

#[derive(Debug, Clone)]
pub struct BookingRoom {
    pub room_id: RoomId,
    pub room_name: String,
}
