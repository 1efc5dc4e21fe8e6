use crate::{
    extractor::AuthorizedUser,
    model::rating::{
        ClearRatingsResponse, CreateRatingRequest, CreateRatingRequestWithIds,
        RatingCreatedResponse, RatingsResponse,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use garde::Validate;
use kernel::model::id::BookingId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn rate_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateRatingRequest>,
) -> AppResult<(StatusCode, Json<RatingCreatedResponse>)> {
    req.validate(&())?;

    let rating_id = registry
        .rating_repository()
        .create(CreateRatingRequestWithIds::new(booking_id, user.id(), Utc::now(), req).into())
        .await?;

    Ok((StatusCode::CREATED, Json(RatingCreatedResponse { rating_id })))
}

pub async fn show_booking_ratings(
    _user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RatingsResponse>> {
    if registry
        .booking_repository()
        .find_by_id(booking_id)
        .await?
        .is_none()
    {
        return Err(AppError::EntityNotFound(format!(
            "booking ({booking_id}) was not found"
        )));
    }

    registry
        .rating_repository()
        .find_by_booking_id(booking_id)
        .await
        .map(RatingsResponse::from)
        .map(Json)
}

pub async fn clear_ratings(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ClearRatingsResponse>> {
    user.ensure_admin()?;

    let deleted_count = registry.rating_repository().delete_all().await?;

    Ok(Json(ClearRatingsResponse { deleted_count }))
}
