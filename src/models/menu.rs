use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::recipe::RecipeSummary;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MenuStatus {
    Draft,
    Published,
    Archived,
}

impl std::fmt::Display for MenuStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MenuStatus::Draft => "draft",
            MenuStatus::Published => "published",
            MenuStatus::Archived => "archived",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for MenuStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(MenuStatus::Draft),
            "published" => Ok(MenuStatus::Published),
            "archived" => Ok(MenuStatus::Archived),
            _ => Err(anyhow::anyhow!("Unknown menu status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MenuType {
    Weekly,
    Daily,
    Custom,
}

impl std::fmt::Display for MenuType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MenuType::Weekly => "weekly",
            MenuType::Daily => "daily",
            MenuType::Custom => "custom",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MealTime {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl std::fmt::Display for MealTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MealTime::Breakfast => "breakfast",
            MealTime::Lunch => "lunch",
            MealTime::Dinner => "dinner",
            MealTime::Snack => "snack",
        };
        write!(f, "{s}")
    }
}

/// DB row struct — status/menu_type fetched as TEXT.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Menu {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub menu_type: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub family_group_id: Uuid,
    pub created_by: Uuid,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Menu {
    /// Whether a date falls inside the menu's inclusive [start, end] range.
    pub fn date_within_range(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuItem {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub recipe_id: Uuid,
    pub date: NaiveDate,
    pub meal_time: String,
    pub servings: Option<i32>,
    pub note: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Menu item joined with its recipe projection.
#[derive(Debug, Clone, Serialize)]
pub struct MenuItemWithRecipe {
    #[serde(flatten)]
    pub item: MenuItem,
    pub recipe: RecipeSummary,
}

/// Full menu tree returned by GET /menus/{id} and share redemption.
#[derive(Debug, Serialize)]
pub struct MenuWithItems {
    #[serde(flatten)]
    pub menu: Menu,
    pub items: Vec<MenuItemWithRecipe>,
}

// Request/Response DTOs
#[derive(Debug, Deserialize)]
pub struct CreateMenuRequest {
    pub name: String,
    pub description: Option<String>,
    pub menu_type: Option<MenuType>,
    pub status: Option<MenuStatus>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub family_group_id: Uuid,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMenuRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub menu_type: Option<MenuType>,
    pub status: Option<MenuStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
}

/// Query params for GET /menus.
#[derive(Debug, Deserialize)]
pub struct MenuListQuery {
    pub family_group_id: Uuid,
    pub status: Option<MenuStatus>,
    /// Together with end_date, selects menus whose range overlaps [start_date, end_date].
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MenuListResponse {
    pub items: Vec<Menu>,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateMenuItemRequest {
    pub recipe_id: Uuid,
    pub date: NaiveDate,
    pub meal_time: MealTime,
    pub servings: Option<i32>,
    pub note: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMenuItemRequest {
    pub date: Option<NaiveDate>,
    pub meal_time: Option<MealTime>,
    pub servings: Option<i32>,
    pub note: Option<String>,
    pub sort_order: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(start: NaiveDate, end: NaiveDate) -> Menu {
        Menu {
            id: Uuid::new_v4(),
            name: "Week plan".into(),
            description: None,
            menu_type: "weekly".into(),
            status: "draft".into(),
            start_date: start,
            end_date: end,
            family_group_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            tags: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_date_within_range_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let m = menu(start, end);

        assert!(m.date_within_range(start));
        assert!(m.date_within_range(end));
        assert!(m.date_within_range(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()));
        assert!(!m.date_within_range(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
        assert!(!m.date_within_range(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()));
    }

    #[test]
    fn test_single_day_range() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let m = menu(day, day);
        assert!(m.date_within_range(day));
        assert!(!m.date_within_range(day.succ_opt().unwrap()));
    }

    #[test]
    fn test_menu_status_round_trip() {
        for status in [MenuStatus::Draft, MenuStatus::Published, MenuStatus::Archived] {
            let parsed: MenuStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("deleted".parse::<MenuStatus>().is_err());
    }
}
