//! People API endpoints.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::DeleteResponse;
use crate::state::AppState;

/// Create people routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_people).post(create_person))
        .route(
            "/{person_id}",
            get(get_person).put(update_person).delete(delete_person),
        )
}

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct CreatePersonRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PersonResponse {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

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

/// GET /api/people
async fn list_people(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = sqlx::query_as::<_, PersonRow>("SELECT * FROM people ORDER BY name")
        .fetch_all(state.db().pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list people");
            ApiError::internal("internal_error", "Failed to list people")
        })?;

    let items: Vec<PersonResponse> = rows.into_iter().map(PersonResponse::from).collect();
    Ok(Json(items))
}

/// GET /api/people/{person_id}
async fn get_person(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let row = sqlx::query_as::<_, PersonRow>("SELECT * FROM people WHERE id = ?")
        .bind(person_id)
        .fetch_optional(state.db().pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, person_id, "Failed to get person");
            ApiError::internal("internal_error", "Failed to get person")
        })?;

    match row {
        Some(row) => Ok(Json(PersonResponse::from(row))),
        None => Err(ApiError::not_found(
            "person_not_found",
            format!("Person {person_id} not found"),
        )),
    }
}

/// POST /api/people
async fn create_person(
    State(state): State<AppState>,
    Json(req): Json<CreatePersonRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&req.name)?;

    let result = sqlx::query("INSERT INTO people (name, email, notes) VALUES (?, ?, ?)")
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.notes)
        .execute(state.db().pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create person");
            ApiError::internal("internal_error", "Failed to create person")
        })?;

    Ok(Json(PersonResponse {
        id: result.last_insert_rowid(),
        name: req.name,
        email: req.email,
        notes: req.notes,
    }))
}

/// PUT /api/people/{person_id}
async fn update_person(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
    Json(req): Json<CreatePersonRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&req.name)?;

    let result = sqlx::query("UPDATE people SET name = ?, email = ?, notes = ? WHERE id = ?")
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.notes)
        .bind(person_id)
        .execute(state.db().pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, person_id, "Failed to update person");
            ApiError::internal("internal_error", "Failed to update person")
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found(
            "person_not_found",
            format!("Person {person_id} not found"),
        ));
    }

    Ok(Json(PersonResponse {
        id: person_id,
        name: req.name,
        email: req.email,
        notes: req.notes,
    }))
}

/// DELETE /api/people/{person_id}
///
/// Schedules referencing this person are removed by the store's cascade.
async fn delete_person(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let result = sqlx::query("DELETE FROM people WHERE id = ?")
        .bind(person_id)
        .execute(state.db().pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, person_id, "Failed to delete person");
            ApiError::internal("internal_error", "Failed to delete person")
        })?;

    Ok(Json(DeleteResponse {
        success: result.rows_affected() > 0,
    }))
}

// =============================================================================
// Database Row Types
// =============================================================================

struct PersonRow {
    id: i64,
    name: String,
    email: Option<String>,
    notes: Option<String>,
}

impl<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> for PersonRow {
    fn from_row(row: &'r sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            notes: row.try_get("notes")?,
        })
    }
}

impl From<PersonRow> for PersonResponse {
    fn from(row: PersonRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            notes: row.notes,
        }
    }
}
