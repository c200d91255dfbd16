use kanban_api::{app, config::AppConfig, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!("starting kanban-api in {:?} mode", config.environment);

    let pool = db::connect(&config.database).await?;

    let port = config.server.port;
    let state = AppState::new(config, pool);
    let router = app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("kanban-api listening on http://{}", bind_addr);

    axum::serve(listener, router).await?;
    Ok(())
}
