use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::user::{
    change_password, get_current_user, register_user, update_current_user,
};

pub fn build_user_router() -> Router<AppRegistry> {
    Router::new()
        .route("/users", post(register_user))
        .route(
            "/users/me",
            get(get_current_user).put(update_current_user),
        )
        .route("/users/me/password", put(change_password))
}
