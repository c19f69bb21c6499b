use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        menu::{CreateMenuItemRequest, Menu, MenuItem, MenuItemWithRecipe, UpdateMenuItemRequest},
        recipe::{Recipe, RecipeSummary},
    },
    services::{families::FamilyService, menus::MenuService},
};

fn item_with_recipe(row: &PgRow) -> MenuItemWithRecipe {
    MenuItemWithRecipe {
        item: MenuItem {
            id: row.get("id"),
            menu_id: row.get("menu_id"),
            recipe_id: row.get("recipe_id"),
            date: row.get("date"),
            meal_time: row.get("meal_time"),
            servings: row.get("servings"),
            note: row.get("note"),
            sort_order: row.get("sort_order"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        },
        recipe: RecipeSummary {
            id: row.get("recipe_id"),
            title: row.get("title"),
            description: row.get("recipe_description"),
            category: row.get("category"),
            difficulty: row.get("difficulty"),
        },
    }
}

pub struct MenuItemService;

impl MenuItemService {
    pub async fn add(
        pool: &PgPool,
        menu_id: Uuid,
        req: &CreateMenuItemRequest,
        user_id: Uuid,
    ) -> Result<MenuItemWithRecipe, ApiError> {
        let menu = MenuService::load(pool, menu_id).await?;
        FamilyService::assert_member(pool, menu.family_group_id, user_id).await?;

        if !menu.date_within_range(req.date) {
            return Err(ApiError::InvalidInput(format!(
                "Item date {} is outside the menu range {} to {}",
                req.date, menu.start_date, menu.end_date
            )));
        }

        // The recipe must belong to the same family group as the menu
        let recipe: Recipe = sqlx::query_as("SELECT * FROM recipes WHERE id = $1")
            .bind(req.recipe_id)
            .fetch_optional(pool)
            .await?
            .filter(|r: &Recipe| r.family_group_id == Some(menu.family_group_id))
            .ok_or_else(|| ApiError::NotFound("Recipe not found in this family group".into()))?;

        let item: MenuItem = sqlx::query_as(
            "INSERT INTO menu_items (menu_id, recipe_id, date, meal_time, servings, note, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(menu_id)
        .bind(req.recipe_id)
        .bind(req.date)
        .bind(req.meal_time.to_string())
        .bind(req.servings)
        .bind(&req.note)
        .bind(req.sort_order.unwrap_or(0))
        .fetch_one(pool)
        .await?;

        Ok(MenuItemWithRecipe {
            item,
            recipe: recipe.summary(),
        })
    }

    /// Composite lookup: the item must belong to the given menu.
    async fn load_item_and_menu(
        pool: &PgPool,
        menu_id: Uuid,
        item_id: Uuid,
    ) -> Result<(MenuItem, Menu), ApiError> {
        let item: MenuItem =
            sqlx::query_as("SELECT * FROM menu_items WHERE id = $1 AND menu_id = $2")
                .bind(item_id)
                .bind(menu_id)
                .fetch_optional(pool)
                .await?
                .ok_or_else(|| ApiError::NotFound("Menu item not found".into()))?;
        let menu = MenuService::load(pool, menu_id).await?;
        Ok((item, menu))
    }

    pub async fn update(
        pool: &PgPool,
        menu_id: Uuid,
        item_id: Uuid,
        req: &UpdateMenuItemRequest,
        user_id: Uuid,
    ) -> Result<MenuItemWithRecipe, ApiError> {
        let (_, menu) = Self::load_item_and_menu(pool, menu_id, item_id).await?;
        FamilyService::assert_member(pool, menu.family_group_id, user_id).await?;

        if let Some(date) = req.date {
            if !menu.date_within_range(date) {
                return Err(ApiError::InvalidInput(format!(
                    "Item date {} is outside the menu range {} to {}",
                    date, menu.start_date, menu.end_date
                )));
            }
        }

        let item: MenuItem = sqlx::query_as(
            "UPDATE menu_items
             SET date       = COALESCE($1, date),
                 meal_time  = COALESCE($2, meal_time),
                 servings   = COALESCE($3, servings),
                 note       = COALESCE($4, note),
                 sort_order = COALESCE($5, sort_order),
                 updated_at = NOW()
             WHERE id = $6 AND menu_id = $7
             RETURNING *",
        )
        .bind(req.date)
        .bind(req.meal_time.map(|m| m.to_string()))
        .bind(req.servings)
        .bind(&req.note)
        .bind(req.sort_order)
        .bind(item_id)
        .bind(menu_id)
        .fetch_one(pool)
        .await?;

        let recipe: RecipeSummary = sqlx::query_as(
            "SELECT id, title, description, category, difficulty FROM recipes WHERE id = $1",
        )
        .bind(item.recipe_id)
        .fetch_one(pool)
        .await?;

        Ok(MenuItemWithRecipe { item, recipe })
    }

    pub async fn delete(
        pool: &PgPool,
        menu_id: Uuid,
        item_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), ApiError> {
        let (item, menu) = Self::load_item_and_menu(pool, menu_id, item_id).await?;
        FamilyService::assert_member(pool, menu.family_group_id, user_id).await?;

        sqlx::query("DELETE FROM menu_items WHERE id = $1 AND menu_id = $2")
            .bind(item.id)
            .bind(menu_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// All items for a menu, each joined with its recipe projection,
    /// ordered for day-by-day rendering.
    pub async fn list_with_recipes(
        pool: &PgPool,
        menu_id: Uuid,
    ) -> Result<Vec<MenuItemWithRecipe>, ApiError> {
        let rows = sqlx::query(
            "SELECT mi.id, mi.menu_id, mi.recipe_id, mi.date, mi.meal_time,
                    mi.servings, mi.note, mi.sort_order, mi.created_at, mi.updated_at,
                    r.title, r.description AS recipe_description, r.category, r.difficulty
             FROM menu_items mi
             JOIN recipes r ON r.id = mi.recipe_id
             WHERE mi.menu_id = $1
             ORDER BY mi.date, mi.sort_order, mi.created_at",
        )
        .bind(menu_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.iter().map(item_with_recipe).collect())
    }
}
