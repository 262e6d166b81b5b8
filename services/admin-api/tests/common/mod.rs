//! Shared integration-test harness: boots the API on an ephemeral port with
//! a temp-file SQLite database and drives it over HTTP.

use haven_admin_api::{
    api,
    db::{Database, DbConfig},
    state::AppState,
};
use serde_json::Value;

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    _tmp: tempfile::TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info,haven_admin_api=debug,sqlx=warn".into()),
            )
            .with_test_writer()
            .try_init();

        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let db_path = tmp.path().join("haven.db");

        let config = DbConfig {
            database_url: format!("sqlite://{}", db_path.display()),
            ..Default::default()
        };

        let db = Database::connect(&config).await.expect("failed to connect");
        db.run_migrations().await.expect("failed to migrate");

        let state = AppState::new(db);
        let app = api::create_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind");
        let addr = listener.local_addr().expect("no local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            _tmp: tmp,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn put(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("request failed")
    }

    /// Create a person, returning its id.
    pub async fn seed_person(&self, name: &str) -> i64 {
        let resp = self
            .post("/api/people", &serde_json::json!({ "name": name }))
            .await;
        assert!(resp.status().is_success(), "failed to create person");
        resp.json::<Value>().await.unwrap()["id"].as_i64().unwrap()
    }

    /// Create a building (no landlord), returning its id.
    pub async fn seed_building(&self, name: &str) -> i64 {
        let resp = self
            .post("/api/buildings", &serde_json::json!({ "name": name }))
            .await;
        assert!(resp.status().is_success(), "failed to create building");
        resp.json::<Value>().await.unwrap()["id"].as_i64().unwrap()
    }

    /// Create a room in `building_id` with the given capacity, returning its id.
    pub async fn seed_room(&self, building_id: i64, name: &str, capacity: i64) -> i64 {
        let resp = self
            .post(
                "/api/rooms",
                &serde_json::json!({
                    "name": name,
                    "building_id": building_id,
                    "capacity": capacity,
                }),
            )
            .await;
        assert!(resp.status().is_success(), "failed to create room");
        resp.json::<Value>().await.unwrap()["id"].as_i64().unwrap()
    }
}
