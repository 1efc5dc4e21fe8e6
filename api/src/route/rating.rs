use axum::{routing::delete, Router};
use registry::AppRegistry;

use crate::handler::rating::clear_ratings;

pub fn build_rating_routers() -> Router<AppRegistry> {
    Router::new().route("/ratings", delete(clear_ratings))
}
