//! Schedule API endpoints.
//!
//! Creates and moves go through the scheduling façade so every write is
//! availability-checked; deletes go straight to the store.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use haven_scheduling::{week_start, Weekday};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::DeleteResponse;
use crate::db::ScheduleRow;
use crate::scheduler::{AssignmentRequest, ScheduleError};
use crate::state::AppState;

/// Create schedule routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schedules).post(create_schedule))
        .route("/{schedule_id}", get(get_schedule).put(move_schedule).delete(delete_schedule))
}

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateScheduleRequest {
    pub person_id: i64,
    pub room_id: i64,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: i64,
    /// Weeks away from the current week; defaults to 0.
    #[serde(default)]
    pub week_offset: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub id: i64,
    pub person_id: i64,
    pub room_id: i64,
    pub day_of_week: i64,
    pub week_offset: i64,
    pub notes: Option<String>,
    pub person_name: Option<String>,
    pub room_name: Option<String>,
    pub building_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListSchedulesResponse {
    pub items: Vec<ScheduleResponse>,
    pub week_offset: i64,
    /// The Sunday starting the requested week.
    pub week_start: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ListSchedulesQuery {
    pub person_id: Option<i64>,
    pub week_offset: Option<i64>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/schedules?person_id=&week_offset=
async fn list_schedules(
    State(state): State<AppState>,
    Query(query): Query<ListSchedulesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let week_offset = query.week_offset.unwrap_or(0);

    let rows = state
        .db()
        .schedules()
        .list(week_offset, query.person_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list schedules");
            ApiError::internal("internal_error", "Failed to list schedules")
        })?;

    Ok(Json(ListSchedulesResponse {
        items: rows.into_iter().map(ScheduleResponse::from).collect(),
        week_offset,
        week_start: week_start(Utc::now().date_naive(), week_offset),
    }))
}

/// GET /api/schedules/{schedule_id}
async fn get_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state.db().schedules().get(schedule_id).await.map_err(|e| {
        tracing::error!(error = %e, schedule_id, "Failed to get schedule");
        ApiError::internal("internal_error", "Failed to get schedule")
    })?;

    match row {
        Some(row) => Ok(Json(ScheduleResponse::from(row))),
        None => Err(ApiError::not_found(
            "schedule_not_found",
            format!("Schedule {schedule_id} not found"),
        )),
    }
}

/// POST /api/schedules
///
/// The candidate assignment runs through the availability engine; rejections
/// come back as 409 with a reason, never as a created row.
async fn create_schedule(
    State(state): State<AppState>,
    Json(req): Json<CreateScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let candidate = parse_candidate(&req)?;
    let row = state
        .scheduler()
        .propose(candidate)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(ScheduleResponse::from(row)))
}

/// PUT /api/schedules/{schedule_id}
///
/// Moves an existing assignment to a new slot; availability-checked against
/// a snapshot that excludes the schedule being moved.
async fn move_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
    Json(req): Json<CreateScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let candidate = parse_candidate(&req)?;
    let row = state
        .scheduler()
        .relocate(schedule_id, candidate)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(ScheduleResponse::from(row)))
}

/// DELETE /api/schedules/{schedule_id}
async fn delete_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let success = state
        .scheduler()
        .remove(schedule_id)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(DeleteResponse { success }))
}

fn parse_candidate(req: &CreateScheduleRequest) -> Result<AssignmentRequest, ApiError> {
    let day_of_week = Weekday::new(req.day_of_week)
        .map_err(|e| ApiError::bad_request("invalid_day_of_week", e.to_string()))?;

    Ok(AssignmentRequest {
        person_id: req.person_id,
        room_id: req.room_id,
        day_of_week,
        week_offset: req.week_offset,
        notes: req.notes.clone(),
    })
}

/// Availability rejections, commit conflicts, and store faults map to
/// distinct error codes so callers can tell "pick another slot" apart from
/// "the room filled up while you were choosing".
fn map_schedule_error(e: ScheduleError) -> ApiError {
    match e {
        ScheduleError::Rejected(rejection) => {
            ApiError::conflict(rejection.code(), rejection.to_string())
        }
        ScheduleError::UnknownPerson { person_id } => ApiError::conflict(
            "unknown_person",
            format!("Person {person_id} does not exist"),
        ),
        ScheduleError::NotFound { schedule_id } => ApiError::not_found(
            "schedule_not_found",
            format!("Schedule {schedule_id} not found"),
        ),
        ScheduleError::CommitConflict(msg) => ApiError::conflict(
            "commit_conflict",
            format!("The assignment could not be committed: {msg}"),
        )
        .retryable(),
        ScheduleError::Store(e) => {
            tracing::error!(error = %e, "Schedule store failure");
            ApiError::internal("internal_error", "Schedule operation failed")
        }
    }
}

impl From<ScheduleRow> for ScheduleResponse {
    fn from(row: ScheduleRow) -> Self {
        Self {
            id: row.id,
            person_id: row.person_id,
            room_id: row.room_id,
            day_of_week: row.day_of_week,
            week_offset: row.week_offset,
            notes: row.notes,
            person_name: row.person_name,
            room_name: row.room_name,
            building_name: row.building_name,
        }
    }
}
