use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::{
    booking::{cancel_booking, create_booking, show_booking, show_my_bookings, show_recent_bookings},
    rating::{rate_booking, show_booking_ratings},
};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let bookings_routers = Router::new()
        .route("/", get(show_recent_bookings).post(create_booking))
        .route("/me", get(show_my_bookings))
        .route("/:booking_id", get(show_booking).delete(cancel_booking))
        .route(
            "/:booking_id/ratings",
            get(show_booking_ratings).post(rate_booking),
        );

    Router::new().nest("/bookings", bookings_routers)
}
