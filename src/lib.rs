use std::sync::Arc;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;

use config::{AppConfig, SecurityConfig};
use db::store::EntityStore;

/// Shared application state: configuration plus the entity store. Cloned per
/// request by axum; both members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: EntityStore,
}

impl AppState {
    pub fn new(config: AppConfig, pool: sqlx::SqlitePool) -> Self {
        Self {
            config: Arc::new(config),
            store: EntityStore::new(pool),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        .route("/health", get(health))
        .route("/token", post(handlers::token::create))
        .route("/boards", get(handlers::boards::list).post(handlers::boards::create))
        .route(
            "/boards/:id",
            axum::routing::patch(handlers::boards::update).delete(handlers::boards::remove),
        )
        .route("/cards", get(handlers::cards::list).post(handlers::cards::create))
        .route(
            "/cards/:id",
            axum::routing::patch(handlers::cards::update).delete(handlers::cards::remove),
        )
        .route("/tasks", get(handlers::tasks::list).post(handlers::tasks::create))
        .route(
            "/tasks/:id",
            axum::routing::patch(handlers::tasks::update).delete(handlers::tasks::remove),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "ok" })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unavailable" })),
            )
        }
    }
}
