#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use kanban_api::config::{AppConfig, DatabaseConfig, Environment, SecurityConfig, ServerConfig};
use kanban_api::{app, auth, db, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_EXPIRES: &str = "1h";

fn test_config() -> AppConfig {
    AppConfig {
        environment: Environment::Development,
        server: ServerConfig { port: 0 },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        security: SecurityConfig {
            jwt_secret: TEST_SECRET.to_string(),
            jwt_expires_in: TEST_EXPIRES.to_string(),
            cors_origins: vec![],
        },
    }
}

/// Router over a fresh in-memory database, one per test.
pub async fn test_app() -> Router {
    let config = test_config();
    let pool = db::connect(&config.database).await.expect("in-memory pool");
    app(AppState::new(config, pool))
}

/// Mint a token directly against the test signing config.
pub fn token(role: &str, permissions: &[&str]) -> String {
    auth::issue_token(
        &test_config().security,
        role.to_string(),
        permissions.iter().map(|s| s.to_string()).collect(),
    )
    .expect("token issuance")
}

/// Drive one request through the router and decode the JSON body (Null for
/// empty bodies such as 204 responses).
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request build");

    let response = app.clone().oneshot(request).await.expect("router response");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}
