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
        recipe::{CreateRecipeRequest, Recipe, RecipeListQuery, UpdateRecipeRequest},
    },
    services::recipes::RecipeService,
    AppState,
};

pub async fn create_recipe(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let recipe = RecipeService::create(&state.db, &body, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn list_recipes(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let recipes = RecipeService::list(&state.db, &query, user.user_id).await?;
    Ok(Json(recipes))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = RecipeService::get(&state.db, id, user.user_id).await?;
    Ok(Json(recipe))
}

pub async fn update_recipe(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRecipeRequest>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = RecipeService::update(&state.db, id, &body, user.user_id).await?;
    Ok(Json(recipe))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    RecipeService::delete(&state.db, id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
