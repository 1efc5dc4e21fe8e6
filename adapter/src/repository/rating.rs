use crate::database::{
    model::{booking::BookingRow, rating::RatingRow},
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    booking::Booking,
    id::{BookingId, RatingId},
    rating::{event::CreateRating, Rating},
};
use kernel::repository::rating::RatingRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct RatingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RatingRepository for RatingRepositoryImpl {
    async fn create(&self, event: CreateRating) -> AppResult<RatingId> {
        let mut tx = self.db.begin().await?;

        // 事前チェック: 予約が存在し、評価者本人のもので、終了済みか
        {
            let row = sqlx::query_as::<_, BookingRow>(
                r#"
                    SELECT
                    b.booking_id, b.booking_reference,
                    b.room_id, r.room_name,
                    b.user_id, u.user_name,
                    b.start_time, b.end_time, b.status,
                    b.created_at, b.cancelled_at
                    FROM bookings AS b
                    INNER JOIN rooms AS r ON b.room_id = r.room_id
                    INNER JOIN users AS u ON b.user_id = u.user_id
                    WHERE b.booking_id = $1
                "#,
            )
            .bind(event.booking_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            let Some(row) = row else {
                return Err(AppError::EntityNotFound(format!(
                    "booking ({}) was not found",
                    event.booking_id
                )));
            };

            Booking::try_from(row)?.ensure_ratable_by(event.rated_by, event.rated_at)?;
        }

        let rating_id = RatingId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO ratings
                (rating_id, booking_id, score, comment, created_at)
                VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(rating_id)
        .bind(event.booking_id)
        .bind(event.score)
        .bind(&event.comment)
        .bind(event.rated_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No rating record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(rating_id)
    }

    async fn find_by_booking_id(&self, booking_id: BookingId) -> AppResult<Vec<Rating>> {
        let rows = sqlx::query_as::<_, RatingRow>(
            r#"
                SELECT rating_id, booking_id, score, comment, created_at
                FROM ratings
                WHERE booking_id = $1
                ORDER BY created_at DESC
            "#,
        )
        .bind(booking_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Rating::from).collect())
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let res = sqlx::query("DELETE FROM ratings")
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        tracing::info!(deleted = res.rows_affected(), "ratings cleared");
        Ok(res.rows_affected())
    }
}
