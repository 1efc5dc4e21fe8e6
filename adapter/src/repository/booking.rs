use crate::database::{model::booking::BookingRow, ConnectionPool};
use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use derive_new::new;
use kernel::model::{
    booking::{
        event::{CancelBooking, CreateBooking},
        interval::TimeInterval,
        reference, Booking, BookingRoom, BookingScope, BookingStatus, BookingUser,
    },
    id::{BookingId, RoomId, UserId},
};
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult};

// 参照番号のランダム部分が衝突した場合に作り直す回数の上限
const MAX_REFERENCE_ATTEMPTS: usize = 5;

const SERIALIZATION_FAILURE: &str = "40001";
const UNIQUE_VIOLATION: &str = "23505";
const EXCLUSION_VIOLATION: &str = "23P01";
const REFERENCE_CONSTRAINT: &str = "bookings_reference_key";

enum CreateAttempt {
    Created(Booking),
    ReferenceTaken,
}

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn create(&self, event: CreateBooking) -> AppResult<Booking> {
        for attempt in 1..=MAX_REFERENCE_ATTEMPTS {
            match self.try_create(&event).await? {
                CreateAttempt::Created(booking) => {
                    tracing::info!(
                        booking.id = %booking.booking_id,
                        booking.reference = %booking.reference,
                        room.id = %event.room_id,
                        "booking created"
                    );
                    return Ok(booking);
                }
                CreateAttempt::ReferenceTaken => {
                    tracing::debug!(attempt, "booking reference collided, regenerating");
                }
            }
        }

        Err(AppError::NoRowsAffectedError(format!(
            "could not allocate a unique booking reference after {MAX_REFERENCE_ATTEMPTS} attempts"
        )))
    }

    async fn is_available(&self, room_id: RoomId, interval: TimeInterval) -> AppResult<bool> {
        self.ensure_room_exists(room_id).await?;

        let overlapping = sqlx::query_scalar::<_, bool>(
            r#"
                SELECT EXISTS (
                    SELECT 1
                    FROM bookings
                    WHERE room_id = $1
                      AND status = 'ACTIVE'
                      AND start_time < $3
                      AND end_time > $2
                )
            "#,
        )
        .bind(room_id)
        .bind(interval.start())
        .bind(interval.end())
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(!overlapping)
    }

    async fn cancel(&self, event: CancelBooking) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // 事前チェック: 予約が存在し、本人のもので、まだ ACTIVE か
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
                    FOR UPDATE OF b
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

            Booking::try_from(row)?
                .ensure_cancellable_by(event.requested_user, event.cancelled_at)?;
        }

        let res = sqlx::query(
            r#"
                UPDATE bookings
                SET status = 'CANCELLED', cancelled_at = $2
                WHERE booking_id = $1 AND status = 'ACTIVE'
            "#,
        )
        .bind(event.booking_id)
        .bind(event.cancelled_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been cancelled".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::info!(booking.id = %event.booking_id, "booking cancelled");
        Ok(())
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, BookingRow>(
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
        .bind(booking_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Booking::try_from)
        .transpose()
    }

    async fn find_by_user_id(
        &self,
        user_id: UserId,
        scope: BookingScope,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, BookingRow>(
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
                WHERE b.user_id = $1
                  AND (
                    $2 = 'all'
                    OR ($2 = 'current' AND b.status = 'ACTIVE' AND b.end_time > $3)
                    OR ($2 = 'past' AND b.end_time <= $3)
                  )
                ORDER BY b.start_time DESC
            "#,
        )
        .bind(user_id)
        .bind(scope.as_ref())
        .bind(now)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Booking::try_from)
        .collect()
    }

    async fn find_recent(&self, limit: i64) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, BookingRow>(
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
                ORDER BY b.start_time DESC
                LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Booking::try_from)
        .collect()
    }
}

impl BookingRepositoryImpl {
    // 空き確認から登録までを SERIALIZABLE なトランザクション一つで行う。
    // 同時に同じ枠を取り合った場合、敗者側は排他制約違反かシリアライズ失敗になる
    async fn try_create(&self, event: &CreateBooking) -> AppResult<CreateAttempt> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let room_name = sqlx::query_scalar::<_, String>(
            r#"
                SELECT room_name FROM rooms WHERE room_id = $1
            "#,
        )
        .bind(event.room_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(conflict_or(AppError::SpecificOperationError))?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("room ({}) was not found", event.room_id))
        })?;

        let user_name = sqlx::query_scalar::<_, String>(
            r#"
                SELECT user_name FROM users WHERE user_id = $1
            "#,
        )
        .bind(event.booked_by)
        .fetch_optional(&mut *tx)
        .await
        .map_err(conflict_or(AppError::SpecificOperationError))?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("user ({}) was not found", event.booked_by))
        })?;

        // 重複条件: existing.start < requested.end AND existing.end > requested.start
        let overlap = sqlx::query_scalar::<_, BookingId>(
            r#"
                SELECT booking_id
                FROM bookings
                WHERE room_id = $1
                  AND status = 'ACTIVE'
                  AND start_time < $3
                  AND end_time > $2
                LIMIT 1
            "#,
        )
        .bind(event.room_id)
        .bind(event.interval.start())
        .bind(event.interval.end())
        .fetch_optional(&mut *tx)
        .await
        .map_err(conflict_or(AppError::SpecificOperationError))?;

        if overlap.is_some() {
            return Err(unavailable(event.room_id));
        }

        // 参照番号の日付と時間帯はサーバーのローカル時刻で決める
        let local_start = event.interval.start().with_timezone(&Local).naive_local();
        let booking_reference = reference::generate(&room_name, &local_start, &user_name);
        let booking_id = BookingId::new();

        let inserted = sqlx::query(
            r#"
                INSERT INTO bookings
                (booking_id, booking_reference, room_id, user_id,
                start_time, end_time, status, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, 'ACTIVE', $7)
            "#,
        )
        .bind(booking_id)
        .bind(&booking_reference)
        .bind(event.room_id)
        .bind(event.booked_by)
        .bind(event.interval.start())
        .bind(event.interval.end())
        .bind(event.booked_at)
        .execute(&mut *tx)
        .await;

        let res = match inserted {
            Ok(res) => res,
            Err(e) if is_reference_collision(&e) => return Ok(CreateAttempt::ReferenceTaken),
            Err(e) if is_booking_race(&e) => return Err(unavailable(event.room_id)),
            Err(e) => return Err(AppError::SpecificOperationError(e)),
        };

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been created".into(),
            ));
        }

        tx.commit()
            .await
            .map_err(conflict_or(AppError::TransactionError))?;

        Ok(CreateAttempt::Created(Booking {
            booking_id,
            reference: booking_reference,
            booked_by: BookingUser {
                user_id: event.booked_by,
                user_name,
            },
            room: BookingRoom {
                room_id: event.room_id,
                room_name,
            },
            start_time: event.interval.start(),
            end_time: event.interval.end(),
            status: BookingStatus::Active,
            created_at: event.booked_at,
            cancelled_at: None,
        }))
    }

    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    async fn ensure_room_exists(&self, room_id: RoomId) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
                SELECT EXISTS (SELECT 1 FROM rooms WHERE room_id = $1)
            "#,
        )
        .bind(room_id)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if !exists {
            return Err(AppError::EntityNotFound(format!(
                "room ({room_id}) was not found"
            )));
        }
        Ok(())
    }
}

fn unavailable(room_id: RoomId) -> AppError {
    AppError::Conflict(format!(
        "room ({room_id}) is already booked for the requested time"
    ))
}

fn sqlstate(e: &sqlx::Error) -> Option<String> {
    e.as_database_error()
        .and_then(|d| d.code())
        .map(|code| code.into_owned())
}

fn is_reference_collision(e: &sqlx::Error) -> bool {
    sqlstate(e).as_deref() == Some(UNIQUE_VIOLATION)
        && e.as_database_error().and_then(|d| d.constraint()) == Some(REFERENCE_CONSTRAINT)
}

fn is_booking_race(e: &sqlx::Error) -> bool {
    matches!(
        sqlstate(e).as_deref(),
        Some(SERIALIZATION_FAILURE) | Some(EXCLUSION_VIOLATION)
    )
}

// SERIALIZABLE のトランザクションでは読み取りやコミットでも競合が表面化する
fn conflict_or(
    fallback: fn(sqlx::Error) -> AppError,
) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        if is_booking_race(&e) {
            AppError::Conflict("the requested time was booked concurrently".into())
        } else {
            fallback(e)
        }
    }
}
