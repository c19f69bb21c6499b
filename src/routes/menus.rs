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
        menu::{
            CreateMenuItemRequest, CreateMenuRequest, Menu, MenuItemWithRecipe, MenuListQuery,
            MenuListResponse, MenuWithItems, UpdateMenuItemRequest, UpdateMenuRequest,
        },
    },
    services::{menu_items::MenuItemService, menus::MenuService},
    AppState,
};

pub async fn create_menu(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateMenuRequest>,
) -> Result<(StatusCode, Json<Menu>), ApiError> {
    let menu = MenuService::create(&state.db, &body, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(menu)))
}

pub async fn list_menus(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<MenuListQuery>,
) -> Result<Json<MenuListResponse>, ApiError> {
    let response = MenuService::list(&state.db, &query, user.user_id).await?;
    Ok(Json(response))
}

pub async fn get_menu(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MenuWithItems>, ApiError> {
    let menu = MenuService::get_with_items(&state.db, id, user.user_id).await?;
    Ok(Json(menu))
}

pub async fn update_menu(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMenuRequest>,
) -> Result<Json<Menu>, ApiError> {
    let menu = MenuService::update(&state.db, id, &body, user.user_id).await?;
    Ok(Json(menu))
}

pub async fn delete_menu(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    MenuService::delete(&state.db, id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_menu_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateMenuItemRequest>,
) -> Result<(StatusCode, Json<MenuItemWithRecipe>), ApiError> {
    let item = MenuItemService::add(&state.db, id, &body, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_menu_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateMenuItemRequest>,
) -> Result<Json<MenuItemWithRecipe>, ApiError> {
    let item = MenuItemService::update(&state.db, id, item_id, &body, user.user_id).await?;
    Ok(Json(item))
}

pub async fn delete_menu_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    MenuItemService::delete(&state.db, id, item_id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
