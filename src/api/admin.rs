//! Maintenance endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

/// Aggregate totals after a reload
#[derive(Serialize, ToSchema)]
pub struct InitializeResponse {
    /// Non-banned members
    pub members: i64,
    /// Book count per genre, indexed by genre
    pub genres: Vec<i64>,
}

/// Recompute the aggregate counters from the store
#[utoipa::path(
    post,
    path = "/initialize",
    tag = "admin",
    responses(
        (status = 200, description = "Counters reloaded", body = InitializeResponse),
        (status = 500, description = "Database error", body = crate::error::ErrorResponse)
    )
)]
pub async fn initialize(State(state): State<crate::AppState>) -> AppResult<Json<InitializeResponse>> {
    let snapshot = state.services.initialize().await?;
    Ok(Json(InitializeResponse {
        members: snapshot.members,
        genres: snapshot.genres.to_vec(),
    }))
}
