//! Demo data seed script
//!
//! Seeds a demo family with realistic data:
//! - 3 users: demo_julie (admin), demo_tom, demo_nora
//! - 1 family group with a fixed invite code (DEMO2024)
//! - 4 recipes across categories
//! - 1 published menu for the current week with items
//! - 1 link share for the menu
//!
//! Usage:
//!   DATABASE_URL=... DEMO_PASSWORD=Demo2024! ./seed-demo
//!
//! Environment variables:
//!   DATABASE_URL   — PostgreSQL connection string (required)
//!   DEMO_PASSWORD  — Password for all demo accounts (default: Demo2024!)

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Utc};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;
use uuid::Uuid;

const DEMO_USERNAMES: [&str; 3] = ["demo_julie", "demo_tom", "demo_nora"];
const DEMO_INVITE_CODE: &str = "DEMO2024";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL required")?;
    let demo_password = env::var("DEMO_PASSWORD").unwrap_or_else(|_| "Demo2024!".to_string());

    println!("=== Seed Demo Family ===");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    mealweek_api::db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    // 1. Clean any previous demo data (groups cascade members/recipes/menus/shares)
    println!("Cleaning existing demo data...");
    let demo_usernames: Vec<String> = DEMO_USERNAMES.iter().map(|s| s.to_string()).collect();
    sqlx::query(
        "DELETE FROM family_groups
         WHERE created_by IN (SELECT id FROM users WHERE username = ANY($1))",
    )
    .bind(&demo_usernames)
    .execute(&pool)
    .await?;
    sqlx::query("DELETE FROM users WHERE username = ANY($1)")
        .bind(&demo_usernames)
        .execute(&pool)
        .await?;

    // 2. Users
    println!("Creating demo users...");
    let password_hash = bcrypt::hash(&demo_password, 12)?;
    let julie = insert_user(&pool, "demo_julie", "Julie Martin", &password_hash).await?;
    let tom = insert_user(&pool, "demo_tom", "Tom Martin", &password_hash).await?;
    let nora = insert_user(&pool, "demo_nora", "Nora Martin", &password_hash).await?;

    // 3. Family group with members
    println!("Creating demo family group...");
    let family_id: Uuid = sqlx::query_scalar(
        "INSERT INTO family_groups (name, invite_code, created_by)
         VALUES ('The Martins (Demo)', $1, $2)
         RETURNING id",
    )
    .bind(DEMO_INVITE_CODE)
    .bind(julie)
    .fetch_one(&pool)
    .await?;

    insert_member(&pool, julie, family_id, "admin").await?;
    insert_member(&pool, tom, family_id, "member").await?;
    insert_member(&pool, nora, family_id, "member").await?;

    // 4. Recipes
    println!("Creating demo recipes...");
    let pancakes = insert_recipe(
        &pool,
        family_id,
        julie,
        "Blueberry Pancakes",
        "breakfast",
        "easy",
        json!([
            { "name": "Flour", "amount": 200, "unit": "g" },
            { "name": "Milk", "amount": 300, "unit": "ml" },
            { "name": "Eggs", "amount": 2, "unit": null },
            { "name": "Blueberries", "amount": 125, "unit": "g" }
        ]),
        json!([
            { "description": "Whisk flour, milk and eggs into a smooth batter", "duration_minutes": 5 },
            { "description": "Fold in the blueberries", "duration_minutes": 1 },
            { "description": "Cook ladlefuls on a hot griddle until golden", "duration_minutes": 15 }
        ]),
    )
    .await?;

    let salad = insert_recipe(
        &pool,
        family_id,
        tom,
        "Greek Salad",
        "lunch",
        "easy",
        json!([
            { "name": "Cucumber", "amount": 1, "unit": null },
            { "name": "Tomatoes", "amount": 4, "unit": null },
            { "name": "Feta", "amount": 150, "unit": "g" },
            { "name": "Olives", "amount": 80, "unit": "g" }
        ]),
        json!([
            { "description": "Chop the vegetables", "duration_minutes": 10 },
            { "description": "Toss with feta, olives and olive oil", "duration_minutes": 2 }
        ]),
    )
    .await?;

    let bolognese = insert_recipe(
        &pool,
        family_id,
        julie,
        "Spaghetti Bolognese",
        "dinner",
        "easy",
        json!([
            { "name": "Spaghetti", "amount": 400, "unit": "g" },
            { "name": "Ground beef", "amount": 500, "unit": "g" },
            { "name": "Tomato passata", "amount": 700, "unit": "ml" },
            { "name": "Onion", "amount": 1, "unit": null }
        ]),
        json!([
            { "description": "Brown the beef with the onion", "duration_minutes": 10 },
            { "description": "Simmer with the passata", "duration_minutes": 30 },
            { "description": "Boil the spaghetti and serve", "duration_minutes": 12 }
        ]),
    )
    .await?;

    let curry = insert_recipe(
        &pool,
        family_id,
        nora,
        "Chicken Curry",
        "dinner",
        "medium",
        json!([
            { "name": "Chicken thighs", "amount": 600, "unit": "g" },
            { "name": "Coconut milk", "amount": 400, "unit": "ml" },
            { "name": "Curry paste", "amount": 3, "unit": "tbsp" },
            { "name": "Rice", "amount": 300, "unit": "g" }
        ]),
        json!([
            { "description": "Fry the curry paste until fragrant", "duration_minutes": 3 },
            { "description": "Add chicken and coconut milk, simmer", "duration_minutes": 25 },
            { "description": "Cook the rice", "duration_minutes": 15 }
        ]),
    )
    .await?;

    // 5. Published menu for the current week
    println!("Creating demo menu...");
    let today = Utc::now().date_naive();
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    let sunday = monday + Duration::days(6);

    let menu_id: Uuid = sqlx::query_scalar(
        "INSERT INTO menus
            (name, description, menu_type, status, start_date, end_date,
             family_group_id, created_by, tags)
         VALUES ('This Week', 'Demo weekly plan', 'weekly', 'published', $1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(monday)
    .bind(sunday)
    .bind(family_id)
    .bind(julie)
    .bind(vec!["demo".to_string(), "weekly".to_string()])
    .fetch_one(&pool)
    .await?;

    let plan = [
        (pancakes, 0i64, "breakfast"),
        (salad, 0, "lunch"),
        (bolognese, 0, "dinner"),
        (curry, 2, "dinner"),
        (pancakes, 5, "breakfast"),
        (bolognese, 6, "dinner"),
    ];
    for (recipe_id, day_offset, meal_time) in plan {
        sqlx::query(
            "INSERT INTO menu_items (menu_id, recipe_id, date, meal_time, servings)
             VALUES ($1, $2, $3, $4, 4)",
        )
        .bind(menu_id)
        .bind(recipe_id)
        .bind(monday + Duration::days(day_offset))
        .bind(meal_time)
        .execute(&pool)
        .await?;
    }

    // 6. Link share
    println!("Creating demo share...");
    let share_id: Uuid = sqlx::query_scalar(
        "INSERT INTO menu_shares (menu_id, share_type, created_by)
         VALUES ($1, 'link', $2)
         RETURNING id",
    )
    .bind(menu_id)
    .bind(julie)
    .fetch_one(&pool)
    .await?;

    println!("Done.");
    println!("  Accounts: {} (password: {demo_password})", DEMO_USERNAMES.join(", "));
    println!("  Invite code: {DEMO_INVITE_CODE}");
    println!("  Menu: {menu_id} ({monday} to {sunday})");
    println!("  Share: /share/{share_id}");

    Ok(())
}

async fn insert_user(pool: &PgPool, username: &str, name: &str, password_hash: &str) -> Result<Uuid> {
    let id = sqlx::query_scalar(
        "INSERT INTO users (username, name, password_hash)
         VALUES ($1, $2, $3)
         RETURNING id",
    )
    .bind(username)
    .bind(name)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn insert_member(pool: &PgPool, user_id: Uuid, family_group_id: Uuid, role: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO family_members (user_id, family_group_id, role)
         VALUES ($1, $2, $3)",
    )
    .bind(user_id)
    .bind(family_group_id)
    .bind(role)
    .execute(pool)
    .await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn insert_recipe(
    pool: &PgPool,
    family_group_id: Uuid,
    created_by: Uuid,
    title: &str,
    category: &str,
    difficulty: &str,
    ingredients: serde_json::Value,
    steps: serde_json::Value,
) -> Result<Uuid> {
    let id = sqlx::query_scalar(
        "INSERT INTO recipes
            (title, category, difficulty, servings, ingredients, steps, created_by, family_group_id)
         VALUES ($1, $2, $3, 4, $4, $5, $6, $7)
         RETURNING id",
    )
    .bind(title)
    .bind(category)
    .bind(difficulty)
    .bind(ingredients)
    .bind(steps)
    .bind(created_by)
    .bind(family_group_id)
    .fetch_one(pool)
    .await?;
    Ok(id)
}
