//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the data directory exists; warn when the seed file is missing.
pub async fn ensure_env(data_dir: &str, seed_path: Option<&str>) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    info!(%data_dir, "data directory ready");

    if let Some(seed) = seed_path {
        if tokio::fs::metadata(Path::new(seed)).await.is_err() {
            warn!(%seed, "seed file not found; startup load will fail");
        }
    }
    Ok(())
}
