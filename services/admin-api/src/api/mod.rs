//! HTTP API handlers and routing.

pub mod error;
mod health;

mod buildings;
mod landlords;
mod people;
mod rooms;
mod schedules;

use axum::{
    http::{header, Method},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Response body for delete operations.
#[derive(Debug, serde::Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub(crate) struct DeleteResponse {
    pub success: bool,
}

/// Create the main API router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        // Health endpoints
        .merge(health::routes())
        // Entity and scheduling routes
        .nest("/api/people", people::routes())
        .nest("/api/landlords", landlords::routes())
        .nest("/api/buildings", buildings::routes())
        .nest("/api/rooms", rooms::routes())
        .nest("/api/schedules", schedules::routes())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Application state
        .with_state(state)
}
