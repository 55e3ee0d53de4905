use anyhow::Context;
use backoffice_api::{
    build_router,
    config::Config,
    state::AppState,
    store::{MemoryStore, PgStore, Store},
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ─── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("backoffice_api=debug,tower_http=info")),
        )
        .init();

    // ─── Config ───────────────────────────────────────────────────────────────
    let config = Config::from_env().context("Failed to load configuration")?;
    let addr = config.server_addr();

    // ─── Store ────────────────────────────────────────────────────────────────
    let store: Arc<dyn Store> = match &config.database_url {
        Some(database_url) => {
            let db = PgPoolOptions::new()
                .max_connections(20)
                .acquire_timeout(Duration::from_secs(5))
                .connect(database_url)
                .await
                .context("Failed to connect to Postgres")?;

            sqlx::migrate!("./migrations")
                .run(&db)
                .await
                .context("Failed to run database migrations")?;

            info!("Database connected and migrations applied");
            Arc::new(PgStore::new(db))
        }
        None => {
            warn!("DATABASE_URL not set; using the in-memory store, data will not persist");
            Arc::new(MemoryStore::new())
        }
    };

    // ─── Router ───────────────────────────────────────────────────────────────
    let app = build_router(AppState::new(store, config));

    // ─── Start Server ─────────────────────────────────────────────────────────
    info!("Back-office API listening on http://{}", addr);
    info!("Swagger UI:  http://{}/docs", addr);
    info!("Health:      http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
