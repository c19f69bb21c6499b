use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        auth::AuthenticatedUser,
        family::{CreateFamilyGroupRequest, FamilyGroup, FamilyMemberInfo, JoinFamilyGroupRequest},
    },
    services::families::FamilyService,
    AppState,
};

pub async fn create_family(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateFamilyGroupRequest>,
) -> Result<(StatusCode, Json<FamilyGroup>), ApiError> {
    let group = FamilyService::create(&state.db, &body, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn join_family(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<JoinFamilyGroupRequest>,
) -> Result<Json<FamilyGroup>, ApiError> {
    let group = FamilyService::join(&state.db, &body.invite_code, user.user_id).await?;
    Ok(Json(group))
}

pub async fn list_families(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<FamilyGroup>>, ApiError> {
    let groups = FamilyService::list_for_user(&state.db, user.user_id).await?;
    Ok(Json(groups))
}

pub async fn list_members(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<FamilyMemberInfo>>, ApiError> {
    let members = FamilyService::members(&state.db, id, user.user_id).await?;
    Ok(Json(members))
}
