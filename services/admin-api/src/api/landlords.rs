//! Landlord API endpoints.

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

/// Create landlord routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_landlords).post(create_landlord))
        .route(
            "/{landlord_id}",
            get(get_landlord)
                .put(update_landlord)
                .delete(delete_landlord),
        )
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateLandlordRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LandlordResponse {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

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

/// GET /api/landlords
async fn list_landlords(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = sqlx::query_as::<_, LandlordRow>("SELECT * FROM landlords ORDER BY name")
        .fetch_all(state.db().pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list landlords");
            ApiError::internal("internal_error", "Failed to list landlords")
        })?;

    let items: Vec<LandlordResponse> = rows.into_iter().map(LandlordResponse::from).collect();
    Ok(Json(items))
}

/// GET /api/landlords/{landlord_id}
async fn get_landlord(
    State(state): State<AppState>,
    Path(landlord_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let row = sqlx::query_as::<_, LandlordRow>("SELECT * FROM landlords WHERE id = ?")
        .bind(landlord_id)
        .fetch_optional(state.db().pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, landlord_id, "Failed to get landlord");
            ApiError::internal("internal_error", "Failed to get landlord")
        })?;

    match row {
        Some(row) => Ok(Json(LandlordResponse::from(row))),
        None => Err(ApiError::not_found(
            "landlord_not_found",
            format!("Landlord {landlord_id} not found"),
        )),
    }
}

/// POST /api/landlords
async fn create_landlord(
    State(state): State<AppState>,
    Json(req): Json<CreateLandlordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&req.name)?;

    let result =
        sqlx::query("INSERT INTO landlords (name, email, phone, notes) VALUES (?, ?, ?, ?)")
            .bind(&req.name)
            .bind(&req.email)
            .bind(&req.phone)
            .bind(&req.notes)
            .execute(state.db().pool())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to create landlord");
                ApiError::internal("internal_error", "Failed to create landlord")
            })?;

    Ok(Json(LandlordResponse {
        id: result.last_insert_rowid(),
        name: req.name,
        email: req.email,
        phone: req.phone,
        notes: req.notes,
    }))
}

/// PUT /api/landlords/{landlord_id}
async fn update_landlord(
    State(state): State<AppState>,
    Path(landlord_id): Path<i64>,
    Json(req): Json<CreateLandlordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&req.name)?;

    let result = sqlx::query(
        "UPDATE landlords SET name = ?, email = ?, phone = ?, notes = ? WHERE id = ?",
    )
    .bind(&req.name)
    .bind(&req.email)
    .bind(&req.phone)
    .bind(&req.notes)
    .bind(landlord_id)
    .execute(state.db().pool())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, landlord_id, "Failed to update landlord");
        ApiError::internal("internal_error", "Failed to update landlord")
    })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found(
            "landlord_not_found",
            format!("Landlord {landlord_id} not found"),
        ));
    }

    Ok(Json(LandlordResponse {
        id: landlord_id,
        name: req.name,
        email: req.email,
        phone: req.phone,
        notes: req.notes,
    }))
}

/// DELETE /api/landlords/{landlord_id}
///
/// Buildings referencing this landlord keep existing; the store nulls the
/// reference out.
async fn delete_landlord(
    State(state): State<AppState>,
    Path(landlord_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let result = sqlx::query("DELETE FROM landlords WHERE id = ?")
        .bind(landlord_id)
        .execute(state.db().pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, landlord_id, "Failed to delete landlord");
            ApiError::internal("internal_error", "Failed to delete landlord")
        })?;

    Ok(Json(DeleteResponse {
        success: result.rows_affected() > 0,
    }))
}

struct LandlordRow {
    id: i64,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    notes: Option<String>,
}

impl<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> for LandlordRow {
    fn from_row(row: &'r sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            notes: row.try_get("notes")?,
        })
    }
}

impl From<LandlordRow> for LandlordResponse {
    fn from(row: LandlordRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            notes: row.notes,
        }
    }
}
