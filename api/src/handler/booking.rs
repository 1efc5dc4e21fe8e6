use crate::{
    extractor::AuthorizedUser,
    model::booking::{BookingListQuery, BookingResponse, BookingsResponse, CreateBookingRequest},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use garde::Validate;
use kernel::model::{
    booking::{
        event::{CancelBooking, CreateBooking},
        interval::TimeInterval,
    },
    id::BookingId,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

// 全体の予約一覧で返す件数
const RECENT_BOOKINGS_LIMIT: i64 = 20;

pub async fn create_booking(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    req.validate(&())?;

    let interval = TimeInterval::new(req.start_time, req.end_time)?;
    let now = Utc::now();
    if interval.start() < now {
        return Err(AppError::UnprocessableEntity(
            "bookings cannot start in the past".into(),
        ));
    }

    let booking = registry
        .booking_repository()
        .create(CreateBooking::new(req.room_id, user.id(), interval, now))
        .await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::at(booking, now))))
}

pub async fn show_recent_bookings(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    let now = Utc::now();
    registry
        .booking_repository()
        .find_recent(RECENT_BOOKINGS_LIMIT)
        .await
        .map(|bookings| BookingsResponse::at(bookings, now))
        .map(Json)
}

pub async fn show_my_bookings(
    user: AuthorizedUser,
    Query(query): Query<BookingListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    let now = Utc::now();
    registry
        .booking_repository()
        .find_by_user_id(user.id(), query.status.into(), now)
        .await
        .map(|bookings| BookingsResponse::at(bookings, now))
        .map(Json)
}

pub async fn show_booking(
    _user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    let now = Utc::now();
    registry
        .booking_repository()
        .find_by_id(booking_id)
        .await
        .and_then(|booking| match booking {
            Some(booking) => Ok(Json(BookingResponse::at(booking, now))),
            None => Err(AppError::EntityNotFound(format!(
                "booking ({booking_id}) was not found"
            ))),
        })
}

pub async fn cancel_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .booking_repository()
        .cancel(CancelBooking::new(booking_id, user.id(), Utc::now()))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
