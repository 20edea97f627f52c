//! HTTP server for the volunteer matching engine.
//!
//! Loads the catalog from `MATCHING_DATA_DIR` and serves recommendations on
//! `MATCHING_BIND_ADDR`. See `config` for every variable; a `.env` file in
//! the working directory is read first.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog::CatalogIndex;
use server::{load_env_file, router, EngineConfig, RecommendationOrchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    load_env_file(Path::new(".env"));
    let config = EngineConfig::from_env();
    info!("Starting matching server");

    info!("Loading catalog from {:?}...", config.data_dir);
    let index = CatalogIndex::load_from_dir(&config.data_dir)
        .with_context(|| format!("Failed to load catalog from {:?}", config.data_dir))?;
    let (users, activities, participations) = index.counts();
    info!(
        "Catalog loaded: {} users, {} activities, {} participations",
        users, activities, participations
    );

    let orchestrator = RecommendationOrchestrator::from_config(Arc::new(index), &config);
    let app = router(orchestrator);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
