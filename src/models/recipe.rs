use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RecipeCategory {
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
    Snack,
    Other,
}

impl std::fmt::Display for RecipeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RecipeCategory::Breakfast => "breakfast",
            RecipeCategory::Lunch => "lunch",
            RecipeCategory::Dinner => "dinner",
            RecipeCategory::Dessert => "dessert",
            RecipeCategory::Snack => "snack",
            RecipeCategory::Other => "other",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{s}")
    }
}

/// Ordered ingredient entry, stored as JSONB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

/// Ordered preparation step, stored as JSONB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeStep {
    pub description: String,
    pub duration_minutes: Option<i32>,
}

/// DB row struct — category/difficulty fetched as TEXT.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub difficulty: String,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub ingredients: Json<Vec<Ingredient>>,
    pub steps: Json<Vec<RecipeStep>>,
    pub created_by: Uuid,
    pub family_group_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection joined onto menu items.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub difficulty: String,
}

impl Recipe {
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            difficulty: self.difficulty.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: RecipeCategory,
    pub difficulty: Difficulty,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<RecipeStep>,
    pub family_group_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<RecipeCategory>,
    pub difficulty: Option<Difficulty>,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub steps: Option<Vec<RecipeStep>>,
}

#[derive(Debug, Deserialize)]
pub struct RecipeListQuery {
    pub family_group_id: Option<Uuid>,
    pub category: Option<RecipeCategory>,
}
