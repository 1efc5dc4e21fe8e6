use crate::model::health::{DatabaseHealthResponse, DatabaseState};
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use registry::AppRegistry;

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

pub async fn health_check_db(
    State(registry): State<AppRegistry>,
) -> (StatusCode, Json<DatabaseHealthResponse>) {
    let (status, database) = if registry.health_check_repository().check_db().await {
        (StatusCode::OK, DatabaseState::Connected)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, DatabaseState::Disconnected)
    };

    (
        status,
        Json(DatabaseHealthResponse {
            database,
            timestamp: Utc::now(),
        }),
    )
}
