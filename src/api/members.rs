//! Member endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        lending::LendingDetails,
        member::{CreateMember, Member, MemberPage, MemberQuery, UpdateMember},
    },
};

use super::{AppJson, EncryptedQuery};

/// Register a new member
#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    request_body = CreateMember,
    responses(
        (status = 201, description = "Member registered", body = Member),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn register_member(
    State(state): State<crate::AppState>,
    AppJson(request): AppJson<CreateMember>,
) -> AppResult<(StatusCode, Json<Member>)> {
    let member = state.services.members.register(request).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// List non-banned members
#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    params(MemberQuery),
    responses(
        (status = 200, description = "One page of members", body = MemberPage),
        (status = 400, description = "Invalid order", body = crate::error::ErrorResponse),
        (status = 404, description = "No members to show in this page", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_members(
    State(state): State<crate::AppState>,
    Query(query): Query<MemberQuery>,
) -> AppResult<Json<MemberPage>> {
    let page = state.services.members.list(&query).await?;
    Ok(Json(page))
}

/// Get a member by ID
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "members",
    params(
        ("id" = String, Path, description = "Member ID, or codec token when encrypted"),
        EncryptedQuery
    ),
    responses(
        (status = 200, description = "Member details", body = Member),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_member(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Query(query): Query<EncryptedQuery>,
) -> AppResult<Json<Member>> {
    let member = state.services.members.get(&id, query.encrypted()?).await?;
    Ok(Json(member))
}

/// Edit a member
#[utoipa::path(
    patch,
    path = "/members/{id}",
    tag = "members",
    params(
        ("id" = String, Path, description = "Member ID")
    ),
    request_body = UpdateMember,
    responses(
        (status = 204, description = "Member updated"),
        (status = 400, description = "Nothing to update", body = crate::error::ErrorResponse),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_member(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    AppJson(update): AppJson<UpdateMember>,
) -> AppResult<StatusCode> {
    state.services.members.update(&id, update).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ban a member; their lendings are released
#[utoipa::path(
    delete,
    path = "/members/{id}",
    tag = "members",
    params(
        ("id" = String, Path, description = "Member ID")
    ),
    responses(
        (status = 204, description = "Member banned"),
        (status = 404, description = "Member not found or already banned", body = crate::error::ErrorResponse)
    )
)]
pub async fn ban_member(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.members.ban(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Live lendings of a member
#[utoipa::path(
    get,
    path = "/members/{id}/lendings",
    tag = "members",
    params(
        ("id" = String, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Lendings held by the member", body = Vec<LendingDetails>),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn member_lendings(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<LendingDetails>>> {
    let lendings = state.services.members.lendings(&id).await?;
    Ok(Json(lendings))
}
