use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::room::{
    check_room_availability, register_room, show_available_rooms, show_room, show_room_list,
};

pub fn build_room_routers() -> Router<AppRegistry> {
    let rooms_routers = Router::new()
        .route("/", get(show_room_list).post(register_room))
        .route("/available", get(show_available_rooms))
        .route("/:room_id", get(show_room))
        .route("/:room_id/availability", get(check_room_availability));

    Router::new().nest("/rooms", rooms_routers)
}
