use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        auth::AuthenticatedUser,
        menu::MenuWithItems,
        share::{CreateShareRequest, MenuShare, RedeemShareQuery, ShareResponse},
    },
    services::{metrics, shares::ShareService},
    AppState,
};

pub async fn create_share(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateShareRequest>,
) -> Result<(StatusCode, Json<ShareResponse>), ApiError> {
    let share = ShareService::create(
        &state.db,
        id,
        &body,
        user.user_id,
        &state.config.app_base_url,
    )
    .await?;
    metrics::SHARES_CREATED_COUNTER
        .with_label_values(&[&share.share.share_type])
        .inc();
    Ok((StatusCode::CREATED, Json(share)))
}

pub async fn list_shares(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MenuShare>>, ApiError> {
    let shares = ShareService::list(&state.db, id, user.user_id).await?;
    Ok(Json(shares))
}

pub async fn delete_share(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(share_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    ShareService::delete(&state.db, share_id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Public: no bearer token. The share itself is the authorization.
pub async fn get_shared_menu(
    State(state): State<AppState>,
    Path(share_id): Path<Uuid>,
    Query(query): Query<RedeemShareQuery>,
) -> Result<Json<MenuWithItems>, ApiError> {
    match ShareService::redeem(&state.db, share_id, query.token.as_deref()).await {
        Ok(tree) => {
            metrics::SHARE_REDEMPTIONS_COUNTER
                .with_label_values(&["success"])
                .inc();
            Ok(Json(tree))
        }
        Err(e) => {
            metrics::SHARE_REDEMPTIONS_COUNTER
                .with_label_values(&["denied"])
                .inc();
            Err(e)
        }
    }
}
