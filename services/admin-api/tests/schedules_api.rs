//! Scheduling integration tests: availability-checked creates and moves,
//! occupancy display, and the freed-slot lifecycle.

mod common;

use common::TestApp;
use serde_json::{json, Value};

fn schedule_body(person_id: i64, room_id: i64, day: i64) -> Value {
    json!({ "person_id": person_id, "room_id": room_id, "day_of_week": day })
}

#[tokio::test]
async fn capacity_fills_then_rejects_with_diagnostics() {
    let app = TestApp::spawn().await;
    let building = app.seed_building("North House").await;
    let room = app.seed_room(building, "2B", 2).await;

    let alice = app.seed_person("Alice").await;
    let bob = app.seed_person("Bob").await;
    let carol = app.seed_person("Carol").await;

    // Two admits fill the room for day 1.
    for person in [alice, bob] {
        let resp = app
            .post("/api/schedules", &schedule_body(person, room, 1))
            .await;
        assert_eq!(resp.status(), 200);
    }

    // Third person on the same room/day bounces with the 2/2 diagnostic.
    let resp = app
        .post("/api/schedules", &schedule_body(carol, room, 1))
        .await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "room_at_capacity");
    assert!(body["detail"].as_str().unwrap().contains("2/2"));

    // A different day in the same room is still open.
    let resp = app
        .post("/api/schedules", &schedule_body(carol, room, 2))
        .await;
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn double_booking_rejected_even_with_free_capacity() {
    let app = TestApp::spawn().await;
    let building = app.seed_building("North House").await;
    let r1 = app.seed_room(building, "1A", 1).await;
    let r2 = app.seed_room(building, "1B", 5).await;
    let person = app.seed_person("Ada").await;

    let resp = app.post("/api/schedules", &schedule_body(person, r1, 3)).await;
    assert_eq!(resp.status(), 200);

    // Plenty of space in 1B, but the person is already booked that day.
    let resp = app.post("/api/schedules", &schedule_body(person, r2, 3)).await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "double_booked");
}

#[tokio::test]
async fn exact_duplicate_is_rejected_before_the_store() {
    let app = TestApp::spawn().await;
    let building = app.seed_building("North House").await;
    let room = app.seed_room(building, "2B", 3).await;
    let person = app.seed_person("Ada").await;

    let resp = app.post("/api/schedules", &schedule_body(person, room, 5)).await;
    assert_eq!(resp.status(), 200);

    let resp = app.post("/api/schedules", &schedule_body(person, room, 5)).await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "duplicate_schedule");
}

#[tokio::test]
async fn week_offsets_are_independent() {
    let app = TestApp::spawn().await;
    let building = app.seed_building("North House").await;
    let room = app.seed_room(building, "2B", 1).await;
    let person = app.seed_person("Ada").await;

    let resp = app.post("/api/schedules", &schedule_body(person, room, 3)).await;
    assert_eq!(resp.status(), 200);

    // Same slot next week is a different slot.
    let resp = app
        .post(
            "/api/schedules",
            &json!({ "person_id": person, "room_id": room, "day_of_week": 3, "week_offset": 1 }),
        )
        .await;
    assert_eq!(resp.status(), 200);

    // Listing filters by week.
    let this_week: Value = app.get("/api/schedules").await.json().await.unwrap();
    assert_eq!(this_week["items"].as_array().unwrap().len(), 1);
    assert_eq!(this_week["week_offset"], 0);
    assert!(this_week["week_start"].is_string());

    let next_week: Value = app
        .get("/api/schedules?week_offset=1")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(next_week["items"].as_array().unwrap().len(), 1);
    assert_eq!(next_week["items"][0]["week_offset"], 1);
}

#[tokio::test]
async fn stale_references_are_rejected_not_crashed() {
    let app = TestApp::spawn().await;
    let building = app.seed_building("North House").await;
    let room = app.seed_room(building, "2B", 1).await;
    let person = app.seed_person("Ada").await;

    // Unknown room
    let resp = app.post("/api/schedules", &schedule_body(person, 999, 1)).await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "unknown_room");

    // Unknown person
    let resp = app.post("/api/schedules", &schedule_body(999, room, 1)).await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "unknown_person");

    // Day outside 0..=6 never reaches the engine.
    let resp = app.post("/api/schedules", &schedule_body(person, room, 7)).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "invalid_day_of_week");
}

#[tokio::test]
async fn deleting_a_schedule_frees_the_slot() {
    let app = TestApp::spawn().await;
    let building = app.seed_building("North House").await;
    let room = app.seed_room(building, "1A", 1).await;
    let alice = app.seed_person("Alice").await;
    let bob = app.seed_person("Bob").await;

    let resp = app.post("/api/schedules", &schedule_body(alice, room, 2)).await;
    assert_eq!(resp.status(), 200);
    let schedule_id = resp.json::<Value>().await.unwrap()["id"].as_i64().unwrap();

    // Room is full for Bob.
    let resp = app.post("/api/schedules", &schedule_body(bob, room, 2)).await;
    assert_eq!(resp.status(), 409);

    // Removal needs no availability check and frees the slot.
    let body: Value = app
        .delete(&format!("/api/schedules/{schedule_id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], true);

    let resp = app.post("/api/schedules", &schedule_body(bob, room, 2)).await;
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn rooms_report_weekly_occupancy_and_pressure() {
    let app = TestApp::spawn().await;
    let building = app.seed_building("North House").await;
    let room = app.seed_room(building, "2B", 2).await;
    let alice = app.seed_person("Alice").await;
    let bob = app.seed_person("Bob").await;

    app.post("/api/schedules", &schedule_body(alice, room, 1)).await;
    app.post("/api/schedules", &schedule_body(bob, room, 1)).await;
    app.post("/api/schedules", &schedule_body(alice, room, 4)).await;

    let rooms: Value = app.get("/api/rooms").await.json().await.unwrap();
    let entry = &rooms.as_array().unwrap()[0];
    assert_eq!(entry["daily_occupancy"], json!([0, 2, 0, 0, 1, 0, 0]));
    assert_eq!(entry["peak_occupancy"], 2);
    // Peak 2 of capacity 2: the room is flagged.
    assert_eq!(entry["capacity_pressure"], "at_risk");

    // Another week has no assignments.
    let rooms: Value = app
        .get("/api/rooms?week_offset=1")
        .await
        .json()
        .await
        .unwrap();
    let entry = &rooms.as_array().unwrap()[0];
    assert_eq!(entry["daily_occupancy"], json!([0, 0, 0, 0, 0, 0, 0]));
    assert_eq!(entry["capacity_pressure"], "ok");
}

#[tokio::test]
async fn moving_a_schedule_rechecks_availability() {
    let app = TestApp::spawn().await;
    let building = app.seed_building("North House").await;
    let r1 = app.seed_room(building, "1A", 1).await;
    let r2 = app.seed_room(building, "1B", 1).await;
    let alice = app.seed_person("Alice").await;
    let bob = app.seed_person("Bob").await;

    let resp = app.post("/api/schedules", &schedule_body(alice, r1, 2)).await;
    let schedule_id = resp.json::<Value>().await.unwrap()["id"].as_i64().unwrap();

    app.post("/api/schedules", &schedule_body(bob, r2, 3)).await;

    // Moving onto Bob's slot is rejected.
    let resp = app
        .put(
            &format!("/api/schedules/{schedule_id}"),
            &schedule_body(alice, r2, 3),
        )
        .await;
    assert_eq!(resp.status(), 409);

    // Moving to a free day works.
    let resp = app
        .put(
            &format!("/api/schedules/{schedule_id}"),
            &schedule_body(alice, r1, 5),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let moved: Value = resp.json().await.unwrap();
    assert_eq!(moved["day_of_week"], 5);

    // Re-saving the same slot does not count against itself.
    let resp = app
        .put(
            &format!("/api/schedules/{schedule_id}"),
            &json!({ "person_id": alice, "room_id": r1, "day_of_week": 5, "notes": "late arrival" }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["notes"], "late arrival");

    // Moving a schedule that does not exist is a 404.
    let resp = app
        .put("/api/schedules/9999", &schedule_body(alice, r1, 6))
        .await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn deleting_a_room_cascades_to_its_schedules() {
    let app = TestApp::spawn().await;
    let building = app.seed_building("North House").await;
    let room = app.seed_room(building, "2B", 2).await;
    let person = app.seed_person("Ada").await;

    app.post("/api/schedules", &schedule_body(person, room, 1)).await;

    let body: Value = app
        .delete(&format!("/api/rooms/{room}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], true);

    let schedules: Value = app.get("/api/schedules").await.json().await.unwrap();
    assert_eq!(schedules["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn schedule_list_carries_display_names() {
    let app = TestApp::spawn().await;
    let building = app.seed_building("North House").await;
    let room = app.seed_room(building, "2B", 2).await;
    let person = app.seed_person("Ada").await;

    let resp = app
        .post(
            "/api/schedules",
            &json!({ "person_id": person, "room_id": room, "day_of_week": 1, "notes": "trial week" }),
        )
        .await;
    assert_eq!(resp.status(), 200);

    let listed: Value = app
        .get(&format!("/api/schedules?person_id={person}"))
        .await
        .json()
        .await
        .unwrap();
    let item = &listed["items"][0];
    assert_eq!(item["person_name"], "Ada");
    assert_eq!(item["room_name"], "2B");
    assert_eq!(item["building_name"], "North House");
    assert_eq!(item["notes"], "trial week");
}
