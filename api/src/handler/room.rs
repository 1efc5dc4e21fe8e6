use crate::{
    extractor::AuthorizedUser,
    model::room::{
        AvailabilityQuery, AvailabilityResponse, AvailableRoomsQuery, CreateRoomRequest,
        RoomResponse, RoomsResponse,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use garde::Validate;
use kernel::model::{
    booking::interval::TimeInterval,
    id::RoomId,
    room::{event::CreateRoom, Room},
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_room(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateRoomRequest>,
) -> AppResult<(StatusCode, Json<RoomResponse>)> {
    user.ensure_admin()?;
    req.validate(&())?;

    let event = CreateRoom::from(req);
    let room = Room {
        room_id: RoomId::default(),
        room_name: event.room_name.clone(),
        room_type: event.room_type.clone(),
        capacity: event.capacity,
        equipment: event.equipment,
        image: event.image.clone(),
    };
    let room_id = registry.room_repository().create(event).await?;

    Ok((StatusCode::CREATED, Json(Room { room_id, ..room }.into())))
}

pub async fn show_room_list(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomsResponse>> {
    registry
        .room_repository()
        .find_all()
        .await
        .map(RoomsResponse::from)
        .map(Json)
}

pub async fn show_room(
    _user: AuthorizedUser,
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomResponse>> {
    registry
        .room_repository()
        .find_by_id(room_id)
        .await
        .and_then(|room| match room {
            Some(room) => Ok(Json(room.into())),
            None => Err(AppError::EntityNotFound(format!(
                "room ({room_id}) was not found"
            ))),
        })
}

pub async fn show_available_rooms(
    _user: AuthorizedUser,
    Query(query): Query<AvailableRoomsQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomsResponse>> {
    let interval = query.into_interval(Utc::now())?;

    registry
        .room_repository()
        .find_available(interval)
        .await
        .map(RoomsResponse::from)
        .map(Json)
}

pub async fn check_room_availability(
    _user: AuthorizedUser,
    Path(room_id): Path<RoomId>,
    Query(query): Query<AvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AvailabilityResponse>> {
    let interval = TimeInterval::new(query.start, query.end)?;

    let available = registry
        .booking_repository()
        .is_available(room_id, interval)
        .await?;

    Ok(Json(AvailabilityResponse {
        room_id,
        start: interval.start(),
        end: interval.end(),
        available,
    }))
}
