//! Fetch the latest, popular and new-release collections from AniList and
//! write the snapshot files the server loads.
//! Usage:
//!   cargo run --bin fetch_snapshot
//! Writes into CATALOG_SNAPSHOT_DIR (default public/json, .env supported).
//! Nothing is written unless all three requests succeed.

use anime_catalog::anilist::AniListClient;
use anime_catalog::config::Config;
use anime_catalog::snapshot::fetch_snapshot;
use anyhow::{Context, Result};
use chrono::Utc;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let client = AniListClient::new()?;

    info!("Fetching anime data from AniList");
    let snapshot = fetch_snapshot(&client)
        .await
        .context("Failed to fetch anime data")?;

    let files = snapshot.write_dir(&config.snapshot_dir, Utc::now())?;
    info!(
        "Wrote {} files to {}: {}",
        files.len(),
        config.snapshot_dir.display(),
        files.join(", ")
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    init_tracing();
    if let Err(e) = run().await {
        error!("Snapshot fetch failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}
