//! Lending endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::lending::{LendingBatch, LendingDetails, LendingQuery},
};

use super::{parse_flag, AppJson};

/// Lend a batch of books to a member
#[utoipa::path(
    post,
    path = "/lendings",
    tag = "lendings",
    request_body = LendingBatch,
    responses(
        (status = 201, description = "Books lent", body = Vec<LendingDetails>),
        (status = 400, description = "Empty batch or duplicate book", body = crate::error::ErrorResponse),
        (status = 404, description = "Member or book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "A book is already lent", body = crate::error::ErrorResponse)
    )
)]
pub async fn lend_books(
    State(state): State<crate::AppState>,
    AppJson(batch): AppJson<LendingBatch>,
) -> AppResult<(StatusCode, Json<Vec<LendingDetails>>)> {
    let lendings = state.services.lendings.lend(batch).await?;
    Ok((StatusCode::CREATED, Json(lendings)))
}

/// List live lendings
#[utoipa::path(
    get,
    path = "/lendings",
    tag = "lendings",
    params(LendingQuery),
    responses(
        (status = 200, description = "Live lendings", body = Vec<LendingDetails>),
        (status = 400, description = "Invalid flag", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_lendings(
    State(state): State<crate::AppState>,
    Query(query): Query<LendingQuery>,
) -> AppResult<Json<Vec<LendingDetails>>> {
    let over_due = parse_flag("over_due", query.over_due.as_deref())?;
    let member_id = query.member_id.as_deref().filter(|s| !s.is_empty());
    let lendings = state.services.lendings.list(over_due, member_id).await?;
    Ok(Json(lendings))
}

/// Return a batch of books
#[utoipa::path(
    post,
    path = "/lendings/return",
    tag = "lendings",
    request_body = LendingBatch,
    responses(
        (status = 204, description = "Books returned"),
        (status = 400, description = "Empty batch or duplicate book", body = crate::error::ErrorResponse),
        (status = 404, description = "Member or lending not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_books(
    State(state): State<crate::AppState>,
    AppJson(batch): AppJson<LendingBatch>,
) -> AppResult<StatusCode> {
    state.services.lendings.return_books(batch).await?;
    Ok(StatusCode::NO_CONTENT)
}
