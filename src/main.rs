use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use review_service::app;
use review_service::app_state::AppState;
use review_service::config::Config;
use review_service::gate::RolePermissionGate;
use review_service::store::memory::MemoryReviewStore;
use review_service::store::postgres::PgReviewStore;
use review_service::store::ReviewStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    Config::init();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = Config::get();

    let store: Arc<dyn ReviewStore> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .min_connections(2)
                .idle_timeout(Duration::from_secs(30))
                .connect(url)
                .await
                .context("Failed to connect to the database")?;
            Arc::new(PgReviewStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, falling back to the in-memory review store");
            let store = MemoryReviewStore::new();
            // Seed one product so a fresh dev instance accepts reviews.
            store.add_product(1).await;
            Arc::new(store)
        }
    };

    let state = AppState::new(store, Arc::new(RolePermissionGate));
    let app = app(state);

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid BIND_ADDR: {}", config.bind_addr))?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server encountered an error")?;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        tracing::info!("Received Ctrl+C, shutting down...");
    }
}
