use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use redis::Client as RedisClient;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mealweek_api::{
    config::Config, db, middleware::auth::JwtSecret, routes, services, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let config = Arc::new(config);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let redis_client = RedisClient::open(config.redis_url.as_str())?;
    let redis_conn = redis_client.get_multiplexed_async_connection().await?;
    info!("Redis connected");

    services::metrics::start(pool.clone());

    let state = AppState {
        db: pool,
        redis: redis_conn,
        config: config.clone(),
    };

    // Build CORS: allow the configured app origin exactly.
    // In development (localhost), all origins are allowed.
    let cors_origin = {
        let base = config.app_base_url.clone();
        AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            let o = match origin.to_str() {
                Ok(s) => s,
                Err(_) => return false,
            };
            if o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") {
                return true;
            }
            o == base
        })
    };

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(cors_origin);

    let jwt_secret = JwtSecret(config.jwt_secret.clone());

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        // Auth
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/me", get(routes::auth::me))
        // Family groups
        .route("/families", get(routes::families::list_families).post(routes::families::create_family))
        .route("/families/join", post(routes::families::join_family))
        .route("/families/{id}/members", get(routes::families::list_members))
        // Recipes
        .route("/recipes", get(routes::recipes::list_recipes).post(routes::recipes::create_recipe))
        .route("/recipes/{id}", get(routes::recipes::get_recipe).put(routes::recipes::update_recipe).delete(routes::recipes::delete_recipe))
        // Menus
        .route("/menus", get(routes::menus::list_menus).post(routes::menus::create_menu))
        .route("/menus/{id}", get(routes::menus::get_menu).put(routes::menus::update_menu).delete(routes::menus::delete_menu))
        .route("/menus/{id}/items", post(routes::menus::add_menu_item))
        .route("/menus/{id}/items/{item_id}", put(routes::menus::update_menu_item).delete(routes::menus::delete_menu_item))
        // Shares (redemption is public; management is member-only)
        .route("/menus/{id}/share", get(routes::shares::list_shares).post(routes::shares::create_share))
        .route("/share/{share_id}", get(routes::shares::get_shared_menu).delete(routes::shares::delete_share))
        .layer(axum::Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("mealweek API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
