use crate::database::{model::room::RoomRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    booking::interval::TimeInterval,
    id::RoomId,
    room::{event::CreateRoom, Room},
};
use kernel::repository::room::RoomRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct RoomRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RoomRepository for RoomRepositoryImpl {
    async fn create(&self, event: CreateRoom) -> AppResult<RoomId> {
        let room_id = RoomId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO rooms
                (room_id, room_name, room_type, capacity,
                speaker, whiteboard, monitor, hdmi_cable, image)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(room_id)
        .bind(&event.room_name)
        .bind(&event.room_type)
        .bind(event.capacity)
        .bind(event.equipment.speaker)
        .bind(event.equipment.whiteboard)
        .bind(event.equipment.monitor)
        .bind(event.equipment.hdmi_cable)
        .bind(&event.image)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| match e.as_database_error().and_then(|d| d.constraint()) {
            Some("rooms_room_name_key") => AppError::Conflict(format!(
                "room ({}) already exists",
                event.room_name
            )),
            _ => AppError::SpecificOperationError(e),
        })?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No room record has been created".into(),
            ));
        }

        Ok(room_id)
    }

    async fn find_all(&self) -> AppResult<Vec<Room>> {
        sqlx::query_as::<_, RoomRow>(
            r#"
                SELECT
                room_id, room_name, room_type, capacity,
                speaker, whiteboard, monitor, hdmi_cable, image
                FROM rooms
                ORDER BY room_name ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Room::from).collect())
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Option<Room>> {
        sqlx::query_as::<_, RoomRow>(
            r#"
                SELECT
                room_id, room_name, room_type, capacity,
                speaker, whiteboard, monitor, hdmi_cable, image
                FROM rooms
                WHERE room_id = $1
            "#,
        )
        .bind(room_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map(|row| row.map(Room::from))
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_available(&self, interval: TimeInterval) -> AppResult<Vec<Room>> {
        // 重複条件: existing.start < requested.end AND existing.end > requested.start
        sqlx::query_as::<_, RoomRow>(
            r#"
                SELECT
                r.room_id, r.room_name, r.room_type, r.capacity,
                r.speaker, r.whiteboard, r.monitor, r.hdmi_cable, r.image
                FROM rooms AS r
                WHERE NOT EXISTS (
                    SELECT 1
                    FROM bookings AS b
                    WHERE b.room_id = r.room_id
                      AND b.status = 'ACTIVE'
                      AND b.start_time < $2
                      AND b.end_time > $1
                )
                ORDER BY r.room_name ASC
            "#,
        )
        .bind(interval.start())
        .bind(interval.end())
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Room::from).collect())
        .map_err(AppError::SpecificOperationError)
    }
}
