use super::{
    booking::build_booking_routers, rating::build_rating_routers, room::build_room_routers,
    user::build_user_router,
};
use axum::Router;
use registry::AppRegistry;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_room_routers())
        .merge(build_booking_routers())
        .merge(build_rating_routers())
        .merge(build_user_router());
    Router::new().nest("/api/v1", router)
}
