use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::recipe::{CreateRecipeRequest, Recipe, RecipeListQuery, UpdateRecipeRequest},
    services::families::FamilyService,
};

pub struct RecipeService;

impl RecipeService {
    pub async fn create(
        pool: &PgPool,
        req: &CreateRecipeRequest,
        user_id: Uuid,
    ) -> Result<Recipe, ApiError> {
        if req.title.trim().is_empty() {
            return Err(ApiError::InvalidInput("Recipe title is required".into()));
        }
        if let Some(family_group_id) = req.family_group_id {
            FamilyService::assert_member(pool, family_group_id, user_id).await?;
        }

        let recipe: Recipe = sqlx::query_as(
            "INSERT INTO recipes
                (title, description, category, difficulty, prep_time_minutes,
                 cook_time_minutes, servings, ingredients, steps, created_by, family_group_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *",
        )
        .bind(req.title.trim())
        .bind(&req.description)
        .bind(req.category.to_string())
        .bind(req.difficulty.to_string())
        .bind(req.prep_time_minutes)
        .bind(req.cook_time_minutes)
        .bind(req.servings)
        .bind(Json(&req.ingredients))
        .bind(Json(&req.steps))
        .bind(user_id)
        .bind(req.family_group_id)
        .fetch_one(pool)
        .await?;

        Ok(recipe)
    }

    /// Recipes visible to the caller: their own plus those shared with any
    /// family group they belong to.
    pub async fn list(
        pool: &PgPool,
        query: &RecipeListQuery,
        user_id: Uuid,
    ) -> Result<Vec<Recipe>, ApiError> {
        if let Some(family_group_id) = query.family_group_id {
            FamilyService::assert_member(pool, family_group_id, user_id).await?;
        }

        let mut conditions = vec![
            "(created_by = $1 OR family_group_id IN
               (SELECT family_group_id FROM family_members WHERE user_id = $1))"
                .to_string(),
        ];
        let mut next = 2;
        if query.family_group_id.is_some() {
            conditions.push(format!("family_group_id = ${next}"));
            next += 1;
        }
        if query.category.is_some() {
            conditions.push(format!("category = ${next}"));
        }
        let where_sql = conditions.join(" AND ");

        let sql = format!("SELECT * FROM recipes WHERE {where_sql} ORDER BY title");
        let mut q = sqlx::query_as::<_, Recipe>(&sql).bind(user_id);
        if let Some(family_group_id) = query.family_group_id {
            q = q.bind(family_group_id);
        }
        if let Some(category) = &query.category {
            q = q.bind(category.to_string());
        }

        let recipes = q.fetch_all(pool).await?;
        Ok(recipes)
    }

    pub async fn get(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Recipe, ApiError> {
        let recipe: Recipe = sqlx::query_as("SELECT * FROM recipes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Recipe not found".into()))?;

        if recipe.created_by == user_id {
            return Ok(recipe);
        }
        match recipe.family_group_id {
            Some(family_group_id) => {
                FamilyService::assert_member(pool, family_group_id, user_id).await?;
                Ok(recipe)
            }
            // Private recipe of someone else: don't reveal it exists
            None => Err(ApiError::NotFound("Recipe not found".into())),
        }
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateRecipeRequest,
        user_id: Uuid,
    ) -> Result<Recipe, ApiError> {
        let recipe = Self::get(pool, id, user_id).await?;
        if recipe.created_by != user_id {
            return Err(ApiError::Forbidden(
                "Only the recipe creator can update it".into(),
            ));
        }

        let updated: Recipe = sqlx::query_as(
            "UPDATE recipes
             SET title             = COALESCE($1, title),
                 description       = COALESCE($2, description),
                 category          = COALESCE($3, category),
                 difficulty        = COALESCE($4, difficulty),
                 prep_time_minutes = COALESCE($5, prep_time_minutes),
                 cook_time_minutes = COALESCE($6, cook_time_minutes),
                 servings          = COALESCE($7, servings),
                 ingredients       = COALESCE($8, ingredients),
                 steps             = COALESCE($9, steps),
                 updated_at        = NOW()
             WHERE id = $10
             RETURNING *",
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.category.as_ref().map(|c| c.to_string()))
        .bind(req.difficulty.as_ref().map(|d| d.to_string()))
        .bind(req.prep_time_minutes)
        .bind(req.cook_time_minutes)
        .bind(req.servings)
        .bind(req.ingredients.as_ref().map(Json))
        .bind(req.steps.as_ref().map(Json))
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        let recipe = Self::get(pool, id, user_id).await?;
        if recipe.created_by != user_id {
            return Err(ApiError::Forbidden(
                "Only the recipe creator can delete it".into(),
            ));
        }

        sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
