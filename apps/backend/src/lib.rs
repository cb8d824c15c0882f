pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::models::DbLesson;
use crate::services::cache::TtlCache;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub lessons_cache: Arc<TtlCache<Vec<DbLesson>>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        let cache_ttl = Duration::from_secs(config.lessons_cache_ttl_secs);
        Self {
            db: Arc::new(db),
            lessons_cache: Arc::new(TtlCache::new(cache_ttl)),
            config: Arc::new(config),
        }
    }
}

/// Build the application router with all routes and layers.
pub fn build_router(state: AppState) -> Router {
    // Routes that need a logged in user
    let protected_routes = Router::new()
        .route("/api/users/profile", get(routes::users::profile))
        .route("/api/steps/:id/result", post(routes::steps::set_result))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    // Routes that show the caller's progress when a token is sent
    let optional_auth_routes = Router::new()
        .route("/api/lessons/:id", get(routes::lessons::get))
        .route("/api/lessons/:id/result", get(routes::lessons::result))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::optional_auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/health", get(health_check))
        // Auth routes
        .route("/api/auth/registration", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        // User routes
        .route("/api/users", get(routes::users::list))
        .route(
            "/api/users/:id",
            get(routes::users::get).delete(routes::users::delete),
        )
        // Lesson routes
        .route(
            "/api/lessons",
            get(routes::lessons::list).post(routes::lessons::create),
        )
        .route(
            "/api/lessons/:id",
            put(routes::lessons::update).delete(routes::lessons::delete),
        )
        .route("/api/lessons/:id/steps", post(routes::lessons::add_step))
        // Step routes
        .route(
            "/api/steps/:id",
            get(routes::steps::get)
                .put(routes::steps::update)
                .delete(routes::steps::delete),
        )
        .route("/api/steps/:id/texts", post(routes::steps::add_text));

    Router::new()
        .merge(public_routes)
        .merge(optional_auth_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    match db.delete_expired_tokens().await {
        Ok(removed) if removed > 0 => tracing::info!("Removed {} expired tokens", removed),
        Ok(_) => {}
        Err(e) => tracing::warn!("Failed to remove expired tokens: {}", e),
    }

    let addr = config.addr();
    let app = build_router(AppState::new(db, config));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
