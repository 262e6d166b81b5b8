//! Building API endpoints.
//!
//! Buildings optionally reference a landlord; list and get responses join
//! the landlord's name in for display.

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

/// Create building routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_buildings).post(create_building))
        .route(
            "/{building_id}",
            get(get_building)
                .put(update_building)
                .delete(delete_building),
        )
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateBuildingRequest {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub landlord_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BuildingResponse {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub landlord_id: Option<i64>,
    pub notes: Option<String>,
    pub landlord_name: Option<String>,
}

const SELECT_JOINED: &str = r#"
    SELECT b.id, b.name, b.address, b.landlord_id, b.notes, l.name AS landlord_name
    FROM buildings b
    LEFT JOIN landlords l ON b.landlord_id = l.id
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

async fn fetch_joined(state: &AppState, building_id: i64) -> Result<Option<BuildingRow>, ApiError> {
    let sql = format!("{SELECT_JOINED} WHERE b.id = ?");
    sqlx::query_as::<_, BuildingRow>(&sql)
        .bind(building_id)
        .fetch_optional(state.db().pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, building_id, "Failed to load building");
            ApiError::internal("internal_error", "Failed to load building")
        })
}

/// GET /api/buildings
async fn list_buildings(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let sql = format!("{SELECT_JOINED} ORDER BY b.name");
    let rows = sqlx::query_as::<_, BuildingRow>(&sql)
        .fetch_all(state.db().pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list buildings");
            ApiError::internal("internal_error", "Failed to list buildings")
        })?;

    let items: Vec<BuildingResponse> = rows.into_iter().map(BuildingResponse::from).collect();
    Ok(Json(items))
}

/// GET /api/buildings/{building_id}
async fn get_building(
    State(state): State<AppState>,
    Path(building_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    match fetch_joined(&state, building_id).await? {
        Some(row) => Ok(Json(BuildingResponse::from(row))),
        None => Err(ApiError::not_found(
            "building_not_found",
            format!("Building {building_id} not found"),
        )),
    }
}

/// POST /api/buildings
async fn create_building(
    State(state): State<AppState>,
    Json(req): Json<CreateBuildingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&req.name)?;

    let result =
        sqlx::query("INSERT INTO buildings (name, address, landlord_id, notes) VALUES (?, ?, ?, ?)")
            .bind(&req.name)
            .bind(&req.address)
            .bind(req.landlord_id)
            .bind(&req.notes)
            .execute(state.db().pool())
            .await
            .map_err(|e| map_write_error(e, "Failed to create building"))?;

    let row = fetch_joined(&state, result.last_insert_rowid())
        .await?
        .ok_or_else(|| ApiError::internal("internal_error", "Building not visible after insert"))?;

    Ok(Json(BuildingResponse::from(row)))
}

/// PUT /api/buildings/{building_id}
async fn update_building(
    State(state): State<AppState>,
    Path(building_id): Path<i64>,
    Json(req): Json<CreateBuildingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&req.name)?;

    let result = sqlx::query(
        "UPDATE buildings SET name = ?, address = ?, landlord_id = ?, notes = ? WHERE id = ?",
    )
    .bind(&req.name)
    .bind(&req.address)
    .bind(req.landlord_id)
    .bind(&req.notes)
    .bind(building_id)
    .execute(state.db().pool())
    .await
    .map_err(|e| map_write_error(e, "Failed to update building"))?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found(
            "building_not_found",
            format!("Building {building_id} not found"),
        ));
    }

    let row = fetch_joined(&state, building_id)
        .await?
        .ok_or_else(|| ApiError::internal("internal_error", "Building not visible after update"))?;

    Ok(Json(BuildingResponse::from(row)))
}

/// DELETE /api/buildings/{building_id}
///
/// Rooms in this building (and their schedules) are removed by the store's
/// cascade.
async fn delete_building(
    State(state): State<AppState>,
    Path(building_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let result = sqlx::query("DELETE FROM buildings WHERE id = ?")
        .bind(building_id)
        .execute(state.db().pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, building_id, "Failed to delete building");
            ApiError::internal("internal_error", "Failed to delete building")
        })?;

    Ok(Json(DeleteResponse {
        success: result.rows_affected() > 0,
    }))
}

fn map_write_error(e: sqlx::Error, context: &str) -> ApiError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return ApiError::conflict("unknown_landlord", "Referenced landlord does not exist");
        }
    }
    tracing::error!(error = %e, "{context}");
    ApiError::internal("internal_error", context)
}

struct BuildingRow {
    id: i64,
    name: String,
    address: Option<String>,
    landlord_id: Option<i64>,
    notes: Option<String>,
    landlord_name: Option<String>,
}

impl<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> for BuildingRow {
    fn from_row(row: &'r sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            landlord_id: row.try_get("landlord_id")?,
            notes: row.try_get("notes")?,
            landlord_name: row.try_get("landlord_name")?,
        })
    }
}

impl From<BuildingRow> for BuildingResponse {
    fn from(row: BuildingRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            landlord_id: row.landlord_id,
            notes: row.notes,
            landlord_name: row.landlord_name,
        }
    }
}
