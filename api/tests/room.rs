mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, DurationRound, Utc};
use common::TestApp;
use kernel::model::{
    booking::{reference, BookingStatus},
    role::Role,
};
use serde_json::json;

#[tokio::test]
async fn list_and_show_rooms() {
    let app = TestApp::new();
    app.store.add_user("Adam Nguyen", "adam@example.edu", Role::User);
    let second = app.store.add_room("CB06.06.113");
    app.store.add_room("CB06.06.112");
    let token = app.login("adam@example.edu").await;

    let (status, body) = app.send(Method::GET, "/api/v1/rooms", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["roomName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["CB06.06.112", "CB06.06.113"]);

    let uri = format!("/api/v1/rooms/{}", second.room_id);
    let (status, body) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "CB Building");
    assert_eq!(body["equipmentLabels"].as_array().unwrap().len(), 4);

    let uri = format!("/api/v1/rooms/{}", kernel::model::id::RoomId::new());
    let (status, _) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn available_rooms_exclude_booked_ones() {
    let app = TestApp::new();
    let adam = app.store.add_user("Adam Nguyen", "adam@example.edu", Role::User);
    let busy = app.store.add_room("CB06.06.112");
    app.store.add_room("CB06.06.113");
    let token = app.login("adam@example.edu").await;

    let start = Utc::now().duration_trunc(Duration::hours(1)).unwrap() + Duration::hours(24);
    app.store.add_booking(
        &busy,
        &adam,
        start,
        start + Duration::hours(2),
        BookingStatus::Active,
    );

    let uri = format!(
        "/api/v1/rooms/available?start={}&end={}",
        (start + Duration::hours(1)).format("%Y-%m-%dT%H:%M:%SZ"),
        (start + Duration::hours(3)).format("%Y-%m-%dT%H:%M:%SZ"),
    );
    let (status, body) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["roomName"], "CB06.06.113");

    let uri = format!(
        "/api/v1/rooms/{}/availability?start={}&end={}",
        busy.room_id,
        (start + Duration::hours(1)).format("%Y-%m-%dT%H:%M:%SZ"),
        (start + Duration::hours(3)).format("%Y-%m-%dT%H:%M:%SZ"),
    );
    let (status, body) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);

    // 終了時刻ちょうどから始まる区間は空いている
    let uri = format!(
        "/api/v1/rooms/{}/availability?start={}&end={}",
        busy.room_id,
        (start + Duration::hours(2)).format("%Y-%m-%dT%H:%M:%SZ"),
        (start + Duration::hours(3)).format("%Y-%m-%dT%H:%M:%SZ"),
    );
    let (_, body) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(body["available"], true);
}

#[tokio::test]
async fn only_admin_registers_rooms() {
    let app = TestApp::new();
    app.store.add_user("Adam Nguyen", "adam@example.edu", Role::User);
    app.store.add_user("Admin", "admin@example.edu", Role::Admin);
    let user_token = app.login("adam@example.edu").await;
    let admin_token = app.login("admin@example.edu").await;

    let body = json!({
        "roomName": "cb11.04.300",
        "roomType": "Group Study Room",
        "capacity": 6,
        "equipment": { "monitor": true },
    });

    let (status, _) = app
        .send(Method::POST, "/api/v1/rooms", Some(&user_token), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = app
        .send(Method::POST, "/api/v1/rooms", Some(&admin_token), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["roomName"], "CB11.04.300");
    assert_eq!(created["equipmentLabels"], json!(["Monitor"]));

    let (status, _) = app
        .send(Method::POST, "/api/v1/rooms", Some(&admin_token), Some(body))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn room_names_without_a_reference_abbreviation_are_rejected() {
    let app = TestApp::new();
    app.store.add_user("Admin", "admin@example.edu", Role::Admin);
    let admin_token = app.login("admin@example.edu").await;

    for room_name in ["AB", "LAB-1", "B_2", "Library Hall", "CB01.01.1234567890123456"] {
        let body = json!({
            "roomName": room_name,
            "roomType": "Group Study Room",
            "capacity": 4,
        });
        let (status, _) = app
            .send(Method::POST, "/api/v1/rooms", Some(&admin_token), Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{room_name}");
    }
    let (_, body) = app.send(Method::GET, "/api/v1/rooms", Some(&admin_token), None).await;
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn registered_rooms_always_produce_valid_references() {
    let app = TestApp::new();
    app.store.add_user("Admin", "admin@example.edu", Role::Admin);
    let admin_token = app.login("admin@example.edu").await;

    let start = Utc::now().duration_trunc(Duration::hours(1)).unwrap() + Duration::hours(24);
    for (room_name, abbreviation) in [("cb01.01.12345a", "CB12345A"), ("CB07.02.010", "CB010")] {
        let body = json!({
            "roomName": room_name,
            "roomType": "Group Study Room",
            "capacity": 4,
        });
        let (status, room) = app
            .send(Method::POST, "/api/v1/rooms", Some(&admin_token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{room}");

        let body = json!({
            "roomId": room["roomId"],
            "startTime": start,
            "endTime": start + Duration::hours(1),
        });
        let (status, booking) = app
            .send(Method::POST, "/api/v1/bookings", Some(&admin_token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{booking}");
        let generated = booking["reference"].as_str().unwrap();
        assert!(reference::is_valid(generated), "{generated}");
        assert!(generated.starts_with(&format!("{abbreviation}-")), "{generated}");
    }
}
