#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use api::route::{auth, health::build_health_check_routers, v1};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Local, Utc};
use kernel::model::{
    auth::{event::CreateToken, AccessToken},
    booking::{
        event::{CancelBooking, CreateBooking},
        interval::TimeInterval,
        reference, Booking, BookingRoom, BookingScope, BookingStatus, BookingUser,
    },
    id::{BookingId, RatingId, RoomId, UserId},
    rating::{event::CreateRating, Rating},
    role::Role,
    room::{event::CreateRoom, Equipment, Room},
    user::{
        event::{CreateUser, UpdateUserName, UpdateUserPassword},
        User,
    },
};
use kernel::repository::{
    auth::AuthRepository, booking::BookingRepository, health::HealthCheckRepository,
    rating::RatingRepository, room::RoomRepository, user::UserRepository,
};
use registry::AppRegistry;
use serde_json::Value;
use shared::error::{AppError, AppResult};
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";

// リポジトリ実装をまとめて置き換えるインメモリの状態
#[derive(Default)]
pub struct Store {
    users: Mutex<Vec<(User, String)>>,
    tokens: Mutex<HashMap<String, UserId>>,
    rooms: Mutex<Vec<Room>>,
    bookings: Mutex<Vec<Booking>>,
    ratings: Mutex<Vec<Rating>>,
    database_up: Mutex<bool>,
}

impl Store {
    pub fn add_user(&self, user_name: &str, email: &str, role: Role) -> User {
        let user = User {
            user_id: UserId::new(),
            user_name: user_name.into(),
            email: email.into(),
            role,
        };
        self.users
            .lock()
            .unwrap()
            .push((user.clone(), PASSWORD.into()));
        user
    }

    pub fn add_room(&self, room_name: &str) -> Room {
        let room = Room {
            room_id: RoomId::new(),
            room_name: room_name.into(),
            room_type: "Group Study Room".into(),
            capacity: 8,
            equipment: Equipment {
                speaker: true,
                whiteboard: true,
                monitor: true,
                hdmi_cable: true,
            },
            image: None,
        };
        self.rooms.lock().unwrap().push(room.clone());
        room
    }

    // 過去の予約など、API からは作れない状態を直接入れる
    pub fn add_booking(
        &self,
        room: &Room,
        user: &User,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: BookingStatus,
    ) -> Booking {
        let booking = Booking {
            booking_id: BookingId::new(),
            reference: reference::generate(
                &room.room_name,
                &start.with_timezone(&Local).naive_local(),
                &user.user_name,
            ),
            booked_by: BookingUser {
                user_id: user.user_id,
                user_name: user.user_name.clone(),
            },
            room: BookingRoom {
                room_id: room.room_id,
                room_name: room.room_name.clone(),
            },
            start_time: start,
            end_time: end,
            status,
            created_at: start - chrono::Duration::days(1),
            cancelled_at: None,
        };
        self.bookings.lock().unwrap().push(booking.clone());
        booking
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.bookings.lock().unwrap().clone()
    }

    pub fn ratings_count(&self) -> usize {
        self.ratings.lock().unwrap().len()
    }

    pub fn set_database_up(&self, up: bool) {
        *self.database_up.lock().unwrap() = up;
    }
}

#[derive(Clone)]
pub struct InMemoryRepository {
    store: Arc<Store>,
}

#[async_trait]
impl HealthCheckRepository for InMemoryRepository {
    async fn check_db(&self) -> bool {
        *self.store.database_up.lock().unwrap()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRepository {
    async fn create(&self, event: CreateRoom) -> AppResult<RoomId> {
        let mut rooms = self.store.rooms.lock().unwrap();
        if rooms.iter().any(|r| r.room_name == event.room_name) {
            return Err(AppError::Conflict(format!(
                "room ({}) already exists",
                event.room_name
            )));
        }
        let room_id = RoomId::new();
        rooms.push(Room {
            room_id,
            room_name: event.room_name,
            room_type: event.room_type,
            capacity: event.capacity,
            equipment: event.equipment,
            image: event.image,
        });
        Ok(room_id)
    }

    async fn find_all(&self) -> AppResult<Vec<Room>> {
        let mut rooms = self.store.rooms.lock().unwrap().clone();
        rooms.sort_by(|a, b| a.room_name.cmp(&b.room_name));
        Ok(rooms)
    }

    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Option<Room>> {
        Ok(self
            .store
            .rooms
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.room_id == room_id)
            .cloned())
    }

    async fn find_available(&self, interval: TimeInterval) -> AppResult<Vec<Room>> {
        let bookings = self.store.bookings.lock().unwrap().clone();
        let mut rooms: Vec<Room> = self
            .store
            .rooms
            .lock()
            .unwrap()
            .iter()
            .filter(|room| {
                let taken: Vec<TimeInterval> = active_intervals(&bookings, room.room_id);
                interval.is_free_of(taken.iter())
            })
            .cloned()
            .collect();
        rooms.sort_by(|a, b| a.room_name.cmp(&b.room_name));
        Ok(rooms)
    }
}

fn active_intervals(bookings: &[Booking], room_id: RoomId) -> Vec<TimeInterval> {
    bookings
        .iter()
        .filter(|b| b.room.room_id == room_id && b.status == BookingStatus::Active)
        .map(Booking::interval)
        .collect()
}

#[async_trait]
impl BookingRepository for InMemoryRepository {
    async fn create(&self, event: CreateBooking) -> AppResult<Booking> {
        let room = self
            .store
            .rooms
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.room_id == event.room_id)
            .cloned()
            .ok_or_else(|| AppError::EntityNotFound("room was not found".into()))?;
        let user_name = self
            .store
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.user_id == event.booked_by)
            .map(|(u, _)| u.user_name.clone())
            .ok_or_else(|| AppError::EntityNotFound("user was not found".into()))?;

        // 確認から追加までロックを保持する
        let mut bookings = self.store.bookings.lock().unwrap();
        let taken = active_intervals(&bookings, event.room_id);
        if !event.interval.is_free_of(taken.iter()) {
            return Err(AppError::Conflict("room is already booked".into()));
        }

        let local_start = event.interval.start().with_timezone(&Local).naive_local();
        let booking = Booking {
            booking_id: BookingId::new(),
            reference: reference::generate(&room.room_name, &local_start, &user_name),
            booked_by: BookingUser {
                user_id: event.booked_by,
                user_name,
            },
            room: BookingRoom {
                room_id: room.room_id,
                room_name: room.room_name,
            },
            start_time: event.interval.start(),
            end_time: event.interval.end(),
            status: BookingStatus::Active,
            created_at: event.booked_at,
            cancelled_at: None,
        };
        bookings.push(booking.clone());
        Ok(booking)
    }

    async fn is_available(&self, room_id: RoomId, interval: TimeInterval) -> AppResult<bool> {
        if !self
            .store
            .rooms
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.room_id == room_id)
        {
            return Err(AppError::EntityNotFound("room was not found".into()));
        }
        let bookings = self.store.bookings.lock().unwrap();
        Ok(interval.is_free_of(active_intervals(&bookings, room_id).iter()))
    }

    async fn cancel(&self, event: CancelBooking) -> AppResult<()> {
        let mut bookings = self.store.bookings.lock().unwrap();
        let booking = bookings
            .iter_mut()
            .find(|b| b.booking_id == event.booking_id)
            .ok_or_else(|| AppError::EntityNotFound("booking was not found".into()))?;
        booking.ensure_cancellable_by(event.requested_user, event.cancelled_at)?;
        booking.status = BookingStatus::Cancelled;
        booking.cancelled_at = Some(event.cancelled_at);
        Ok(())
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        Ok(self
            .store
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.booking_id == booking_id)
            .cloned())
    }

    async fn find_by_user_id(
        &self,
        user_id: UserId,
        scope: BookingScope,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .store
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.is_owned_by(user_id) && b.matches_scope(scope, now))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(bookings)
    }

    async fn find_recent(&self, limit: i64) -> AppResult<Vec<Booking>> {
        let mut bookings = self.store.bookings.lock().unwrap().clone();
        bookings.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        bookings.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(bookings)
    }
}

#[async_trait]
impl RatingRepository for InMemoryRepository {
    async fn create(&self, event: CreateRating) -> AppResult<RatingId> {
        let booking = self
            .store
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.booking_id == event.booking_id)
            .cloned()
            .ok_or_else(|| AppError::EntityNotFound("booking was not found".into()))?;
        booking.ensure_ratable_by(event.rated_by, event.rated_at)?;

        let rating_id = RatingId::new();
        self.store.ratings.lock().unwrap().push(Rating {
            rating_id,
            booking_id: event.booking_id,
            score: event.score,
            comment: event.comment,
            created_at: event.rated_at,
        });
        Ok(rating_id)
    }

    async fn find_by_booking_id(&self, booking_id: BookingId) -> AppResult<Vec<Rating>> {
        let mut ratings: Vec<Rating> = self
            .store
            .ratings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.booking_id == booking_id)
            .cloned()
            .collect();
        ratings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(ratings)
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let mut ratings = self.store.ratings.lock().unwrap();
        let deleted = ratings.len() as u64;
        ratings.clear();
        Ok(deleted)
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let mut users = self.store.users.lock().unwrap();
        if users.iter().any(|(u, _)| u.email == event.email) {
            return Err(AppError::Conflict("email is already registered".into()));
        }
        let user = User {
            user_id: UserId::new(),
            user_name: event.user_name,
            email: event.email,
            role: Role::User,
        };
        users.push((user.clone(), event.password));
        Ok(user)
    }

    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        Ok(self
            .store
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.user_id == current_user_id)
            .map(|(u, _)| u.clone()))
    }

    async fn update_password(&self, event: UpdateUserPassword) -> AppResult<()> {
        let mut users = self.store.users.lock().unwrap();
        let (_, password) = users
            .iter_mut()
            .find(|(u, _)| u.user_id == event.user_id)
            .ok_or_else(|| AppError::EntityNotFound("user was not found".into()))?;
        if *password != event.current_password {
            return Err(AppError::UnauthenticatedError);
        }
        *password = event.new_password;
        Ok(())
    }

    async fn update_user_name(&self, event: UpdateUserName) -> AppResult<User> {
        let mut users = self.store.users.lock().unwrap();
        let (user, _) = users
            .iter_mut()
            .find(|(u, _)| u.user_id == event.user_id)
            .ok_or_else(|| AppError::EntityNotFound("user was not found".into()))?;
        user.user_name = event.user_name;
        Ok(user.clone())
    }
}

#[async_trait]
impl AuthRepository for InMemoryRepository {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        Ok(self.store.tokens.lock().unwrap().get(&access_token.0).copied())
    }

    async fn verify_user(&self, email: &str, password: &str) -> AppResult<UserId> {
        self.store
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, p)| u.email == email && p == password)
            .map(|(u, _)| u.user_id)
            .ok_or(AppError::UnauthenticatedError)
    }

    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken> {
        self.store
            .tokens
            .lock()
            .unwrap()
            .insert(event.access_token.clone(), event.user_id);
        Ok(AccessToken(event.access_token))
    }

    async fn delete_token(&self, access_token: AccessToken) -> AppResult<()> {
        self.store.tokens.lock().unwrap().remove(&access_token.0);
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<Store>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(Store::default());
        store.set_database_up(true);
        let repo = Arc::new(InMemoryRepository {
            store: store.clone(),
        });
        let registry = AppRegistry::with_repositories(
            repo.clone(),
            repo.clone(),
            repo.clone(),
            repo.clone(),
            repo.clone(),
            repo,
        );
        let router = Router::new()
            .merge(build_health_check_routers())
            .merge(auth::routes())
            .merge(v1::routes())
            .with_state(registry);
        Self { router, store }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["accessToken"].as_str().unwrap().to_string()
    }
}
