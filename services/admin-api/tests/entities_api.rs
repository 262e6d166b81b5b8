//! Entity CRUD integration tests: people, landlords, buildings, rooms.

mod common;

use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoints_respond() {
    let app = TestApp::spawn().await;

    let resp = app.get("/healthz").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "admin-api");

    let resp = app.get("/readyz").await;
    assert_eq!(resp.status(), 200);

    let resp = app.get("/livez").await;
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn people_crud_roundtrip() {
    let app = TestApp::spawn().await;

    // Create
    let resp = app
        .post(
            "/api/people",
            &json!({ "name": "Ada", "email": "ada@example.com" }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "Ada");

    // List
    let listed: Value = app.get("/api/people").await.json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Update
    let resp = app
        .put(
            &format!("/api/people/{id}"),
            &json!({ "name": "Ada L.", "email": "ada@example.com", "notes": "ground floor" }),
        )
        .await;
    assert_eq!(resp.status(), 200);

    let fetched: Value = app
        .get(&format!("/api/people/{id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["name"], "Ada L.");
    assert_eq!(fetched["notes"], "ground floor");

    // Delete
    let resp = app.delete(&format!("/api/people/{id}")).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);

    // Gone now
    let resp = app.get(&format!("/api/people/{id}")).await;
    assert_eq!(resp.status(), 404);

    // Deleting again reports no-op
    let body: Value = app
        .delete(&format!("/api/people/{id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn person_requires_a_name() {
    let app = TestApp::spawn().await;

    let resp = app.post("/api/people", &json!({ "name": "   " })).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "invalid_name");
}

#[tokio::test]
async fn buildings_join_landlord_name() {
    let app = TestApp::spawn().await;

    let resp = app
        .post(
            "/api/landlords",
            &json!({ "name": "Mr. Wren", "phone": "555-0101" }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let landlord_id = resp.json::<Value>().await.unwrap()["id"].as_i64().unwrap();

    let resp = app
        .post(
            "/api/buildings",
            &json!({ "name": "North House", "landlord_id": landlord_id }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let building: Value = resp.json().await.unwrap();
    assert_eq!(building["landlord_name"], "Mr. Wren");
    let building_id = building["id"].as_i64().unwrap();

    // Deleting the landlord nulls the reference; the building survives.
    let body: Value = app
        .delete(&format!("/api/landlords/{landlord_id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], true);

    let building: Value = app
        .get(&format!("/api/buildings/{building_id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(building["landlord_id"], Value::Null);
    assert_eq!(building["landlord_name"], Value::Null);
}

#[tokio::test]
async fn building_with_unknown_landlord_conflicts() {
    let app = TestApp::spawn().await;

    let resp = app
        .post(
            "/api/buildings",
            &json!({ "name": "Orphan House", "landlord_id": 999 }),
        )
        .await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "unknown_landlord");
}

#[tokio::test]
async fn room_capacity_is_normalized_on_the_way_in() {
    let app = TestApp::spawn().await;
    let building_id = app.seed_building("North House").await;

    for (raw, expected) in [
        (json!("0"), 1),
        (json!("-5"), 1),
        (json!("abc"), 1),
        (json!(null), 1),
        (json!(3.7), 3),
        (json!("4"), 4),
    ] {
        let resp = app
            .post(
                "/api/rooms",
                &json!({ "name": "room", "building_id": building_id, "capacity": raw.clone() }),
            )
            .await;
        assert_eq!(resp.status(), 200);
        let room: Value = resp.json().await.unwrap();
        assert_eq!(room["capacity"], expected, "raw capacity {raw}");
    }

    // Absent capacity defaults to 1.
    let resp = app
        .post(
            "/api/rooms",
            &json!({ "name": "bare", "building_id": building_id }),
        )
        .await;
    let room: Value = resp.json().await.unwrap();
    assert_eq!(room["capacity"], 1);
}

#[tokio::test]
async fn room_requires_existing_building() {
    let app = TestApp::spawn().await;

    let resp = app
        .post("/api/rooms", &json!({ "name": "2B", "building_id": 42 }))
        .await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "unknown_building");
}

#[tokio::test]
async fn room_update_renormalizes_capacity() {
    let app = TestApp::spawn().await;
    let building_id = app.seed_building("North House").await;
    let room_id = app.seed_room(building_id, "2B", 3).await;

    let resp = app
        .put(
            &format!("/api/rooms/{room_id}"),
            &json!({ "name": "2B", "building_id": building_id, "capacity": "0" }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let room: Value = resp.json().await.unwrap();
    assert_eq!(room["capacity"], 1);
    assert_eq!(room["building_name"], "North House");
}
