//! Server binary: configuration, tracing, database bootstrap, serve.

use anyhow::Context;

use court_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured JSON logs; RUST_LOG overrides the default filter.
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "court_api=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env().context("failed to read configuration")?;
    let port = config.port;

    let db_pool = court_api::db::init_pool()
        .await
        .context("database initialization failed")?;

    let state = AppState::with_config(config, db_pool.clone());

    // Rehydrate the in-memory stores from Postgres before serving.
    if let Some(pool) = &db_pool {
        court_api::db::load_stores(pool, &state)
            .await
            .context("failed to load state from database")?;
    }

    let app = court_api::app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    tracing::info!(port, "court-api listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
