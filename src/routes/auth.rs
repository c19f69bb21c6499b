use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::ApiError,
    middleware::rate_limit::check_rate_limit,
    models::{
        auth::AuthenticatedUser,
        user::{AuthResponse, LoginRequest, RegisterRequest, UserProfile},
    },
    services::{auth::AuthService, metrics},
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    // Rate limit: 10 registrations per hour per username
    let rate_key = format!("rate:register:{}", body.username.to_lowercase());
    let mut redis = state.redis.clone();
    check_rate_limit(&mut redis, &rate_key, 10, 3600).await?;

    let response = AuthService::register(
        &state.db,
        &body.username,
        &body.name,
        &body.password,
        &state.config.jwt_secret,
        state.config.jwt_expiry_seconds,
    )
    .await?;

    metrics::REGISTRATIONS_COUNTER.inc();
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    // Rate limit: 5 attempts per 15 min per username
    let rate_key = format!("rate:login:{}", body.username.to_lowercase());
    let mut redis = state.redis.clone();
    check_rate_limit(&mut redis, &rate_key, 5, 900).await?;

    match AuthService::login(
        &state.db,
        &body.username,
        &body.password,
        &state.config.jwt_secret,
        state.config.jwt_expiry_seconds,
    )
    .await
    {
        Ok(response) => {
            metrics::LOGINS_COUNTER.with_label_values(&["success"]).inc();
            Ok(Json(response))
        }
        Err(e) => {
            metrics::LOGINS_COUNTER.with_label_values(&["failure"]).inc();
            Err(e)
        }
    }
}

pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = AuthService::profile(&state.db, user.user_id).await?;
    Ok(Json(profile))
}
