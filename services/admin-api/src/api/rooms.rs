//! Room API endpoints.
//!
//! Rooms belong to a building and carry a per-day capacity. List and get
//! responses include the weekly occupancy profile used by the scheduling
//! grid: per-day counts, the weekly peak, and how close that peak sits to
//! capacity.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use haven_scheduling::{
    compute_daily_occupancy, max_occupancy, normalize_capacity, Assignment, CapacityPressure,
};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::DeleteResponse;
use crate::state::AppState;

/// Create room routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rooms).post(create_room))
        .route(
            "/{room_id}",
            get(get_room).put(update_room).delete(delete_room),
        )
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateRoomRequest {
    pub name: String,
    pub building_id: i64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Raw capacity as the client sent it; normalized before storage.
    #[serde(default)]
    pub capacity: Option<serde_json::Value>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub id: i64,
    pub name: String,
    pub building_id: i64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub capacity: u32,
    pub notes: Option<String>,
    pub building_name: Option<String>,

    /// Assignments per day (Sunday first) for the requested week.
    pub daily_occupancy: [u32; 7],

    /// Peak daily occupancy across the week.
    pub peak_occupancy: u32,

    /// How close the peak sits to capacity: "ok", "near", or "at_risk".
    pub capacity_pressure: CapacityPressure,
}

#[derive(Debug, Deserialize)]
pub struct RoomsQuery {
    pub week_offset: Option<i64>,
}

const SELECT_JOINED: &str = r#"
    SELECT r.id, r.name, r.building_id, r.type, r.capacity, r.notes, b.name AS building_name
    FROM rooms r
    LEFT JOIN buildings b ON r.building_id = b.id
"#;

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::bad_request("invalid_name", "Name cannot be empty"));
    }
    if name.len() > 200 {
        return Err(ApiError::bad_request(
            "invalid_name",
            "Name cannot exceed 200 characters",
        ));
    }
    Ok(())
}

fn room_response(row: RoomRow, week_offset: i64, assignments: &[Assignment]) -> RoomResponse {
    let daily = compute_daily_occupancy(row.id, week_offset, assignments);
    let peak = max_occupancy(&daily);
    let capacity = row.capacity.clamp(1, i64::from(u32::MAX)) as u32;

    RoomResponse {
        id: row.id,
        name: row.name,
        building_id: row.building_id,
        kind: row.kind,
        capacity,
        notes: row.notes,
        building_name: row.building_name,
        daily_occupancy: daily,
        peak_occupancy: peak,
        capacity_pressure: CapacityPressure::assess(peak, capacity),
    }
}

async fn load_assignments(state: &AppState) -> Result<Vec<Assignment>, ApiError> {
    state.db().schedules().assignments().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load assignments");
        ApiError::internal("internal_error", "Failed to load occupancy")
    })
}

async fn fetch_joined(state: &AppState, room_id: i64) -> Result<Option<RoomRow>, ApiError> {
    let sql = format!("{SELECT_JOINED} WHERE r.id = ?");
    sqlx::query_as::<_, RoomRow>(&sql)
        .bind(room_id)
        .fetch_optional(state.db().pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, room_id, "Failed to load room");
            ApiError::internal("internal_error", "Failed to load room")
        })
}

/// GET /api/rooms?week_offset=N
async fn list_rooms(
    State(state): State<AppState>,
    Query(query): Query<RoomsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let week_offset = query.week_offset.unwrap_or(0);

    let sql = format!("{SELECT_JOINED} ORDER BY b.name, r.name");
    let rows = sqlx::query_as::<_, RoomRow>(&sql)
        .fetch_all(state.db().pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list rooms");
            ApiError::internal("internal_error", "Failed to list rooms")
        })?;

    let assignments = load_assignments(&state).await?;
    let items: Vec<RoomResponse> = rows
        .into_iter()
        .map(|row| room_response(row, week_offset, &assignments))
        .collect();

    Ok(Json(items))
}

/// GET /api/rooms/{room_id}?week_offset=N
async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
    Query(query): Query<RoomsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let week_offset = query.week_offset.unwrap_or(0);

    let row = fetch_joined(&state, room_id).await?.ok_or_else(|| {
        ApiError::not_found("room_not_found", format!("Room {room_id} not found"))
    })?;

    let assignments = load_assignments(&state).await?;
    Ok(Json(room_response(row, week_offset, &assignments)))
}

/// POST /api/rooms
async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&req.name)?;
    let capacity = normalize_capacity(req.capacity.as_ref());

    let result = sqlx::query(
        "INSERT INTO rooms (name, building_id, type, capacity, notes) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&req.name)
    .bind(req.building_id)
    .bind(&req.kind)
    .bind(i64::from(capacity))
    .bind(&req.notes)
    .execute(state.db().pool())
    .await
    .map_err(|e| map_write_error(e, "Failed to create room"))?;

    let row = fetch_joined(&state, result.last_insert_rowid())
        .await?
        .ok_or_else(|| ApiError::internal("internal_error", "Room not visible after insert"))?;

    let assignments = load_assignments(&state).await?;
    Ok(Json(room_response(row, 0, &assignments)))
}

/// PUT /api/rooms/{room_id}
async fn update_room(
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&req.name)?;
    let capacity = normalize_capacity(req.capacity.as_ref());

    let result = sqlx::query(
        "UPDATE rooms SET name = ?, building_id = ?, type = ?, capacity = ?, notes = ? WHERE id = ?",
    )
    .bind(&req.name)
    .bind(req.building_id)
    .bind(&req.kind)
    .bind(i64::from(capacity))
    .bind(&req.notes)
    .bind(room_id)
    .execute(state.db().pool())
    .await
    .map_err(|e| map_write_error(e, "Failed to update room"))?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found(
            "room_not_found",
            format!("Room {room_id} not found"),
        ));
    }

    let row = fetch_joined(&state, room_id)
        .await?
        .ok_or_else(|| ApiError::internal("internal_error", "Room not visible after update"))?;

    let assignments = load_assignments(&state).await?;
    Ok(Json(room_response(row, 0, &assignments)))
}

/// DELETE /api/rooms/{room_id}
///
/// Schedules referencing this room are removed by the store's cascade.
async fn delete_room(
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
        .bind(room_id)
        .execute(state.db().pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, room_id, "Failed to delete room");
            ApiError::internal("internal_error", "Failed to delete room")
        })?;

    Ok(Json(DeleteResponse {
        success: result.rows_affected() > 0,
    }))
}

fn map_write_error(e: sqlx::Error, context: &str) -> ApiError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return ApiError::conflict("unknown_building", "Referenced building does not exist");
        }
    }
    tracing::error!(error = %e, "{context}");
    ApiError::internal("internal_error", context)
}

struct RoomRow {
    id: i64,
    name: String,
    building_id: i64,
    kind: Option<String>,
    capacity: i64,
    notes: Option<String>,
    building_name: Option<String>,
}

impl<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> for RoomRow {
    fn from_row(row: &'r sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            building_id: row.try_get("building_id")?,
            kind: row.try_get("type")?,
            capacity: row.try_get("capacity")?,
            notes: row.try_get("notes")?,
            building_name: row.try_get("building_name")?,
        })
    }
}
