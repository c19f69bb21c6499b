use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_gauge, register_gauge_vec, Counter,
    CounterVec, Gauge, GaugeVec,
};
use sqlx::PgPool;
use tracing::{info, warn};

lazy_static! {
    // ── Event counters (increment on each event) ────────────────────────────
    pub static ref LOGINS_COUNTER: CounterVec = register_counter_vec!(
        "api_logins_total",
        "Login attempts by status",
        &["status"]
    ).unwrap();

    pub static ref REGISTRATIONS_COUNTER: Counter = register_counter!(
        "api_registrations_total",
        "Accounts created"
    ).unwrap();

    pub static ref SHARES_CREATED_COUNTER: CounterVec = register_counter_vec!(
        "api_menu_shares_created_total",
        "Menu shares created by type",
        &["share_type"]
    ).unwrap();

    pub static ref SHARE_REDEMPTIONS_COUNTER: CounterVec = register_counter_vec!(
        "api_share_redemptions_total",
        "Public share reads by outcome",
        &["status"]
    ).unwrap();

    // ── Business metrics ────────────────────────────────────────────────────
    pub static ref USERS_GAUGE: Gauge = register_gauge!(
        "mealweek_users_total",
        "Registered users"
    ).unwrap();

    pub static ref FAMILY_GROUPS_GAUGE: Gauge = register_gauge!(
        "mealweek_family_groups_total",
        "Family groups"
    ).unwrap();

    pub static ref RECIPES_GAUGE: Gauge = register_gauge!(
        "mealweek_recipes_total",
        "Stored recipes"
    ).unwrap();

    pub static ref MENUS_GAUGE: GaugeVec = register_gauge_vec!(
        "mealweek_menus_total",
        "Menus by status",
        &["status"]
    ).unwrap();
}

/// Spawn the background metrics collector (refreshes every 5 minutes).
pub fn start(pool: PgPool) {
    tokio::spawn(async move {
        // Initial collection on startup
        if let Err(e) = collect(&pool).await {
            warn!("Metrics: initial collection failed: {}", e);
        }
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
            if let Err(e) = collect(&pool).await {
                warn!("Metrics: collection failed: {}", e);
            }
        }
    });
}

async fn collect(pool: &PgPool) -> anyhow::Result<()> {
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM users")
        .fetch_one(pool)
        .await?;
    USERS_GAUGE.set(users as f64);

    let groups: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM family_groups")
        .fetch_one(pool)
        .await?;
    FAMILY_GROUPS_GAUGE.set(groups as f64);

    let recipes: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM recipes")
        .fetch_one(pool)
        .await?;
    RECIPES_GAUGE.set(recipes as f64);

    let menu_counts: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*)::BIGINT FROM menus GROUP BY status")
            .fetch_all(pool)
            .await
            .unwrap_or_default();
    for (status, count) in menu_counts {
        MENUS_GAUGE.with_label_values(&[&status]).set(count as f64);
    }

    info!("Metrics: collected ({users} users, {groups} groups)");
    Ok(())
}
