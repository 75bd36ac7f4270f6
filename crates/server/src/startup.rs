use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::{AppConfig, StorageConfig};
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::errors::StartupError;
use crate::routes;
use service::{
    loader::VehicleJsonFile,
    storage::json_mirror::JsonMirror,
    vehicle::{VehicleDefault, VehicleMap, VehicleService},
};

/// Shared handler state: the service seam only, never the concrete store.
#[derive(Clone)]
pub struct AppState {
    pub vehicles: Arc<dyn VehicleService>,
}

impl AppState {
    pub fn new(vehicles: Arc<dyn VehicleService>) -> Self {
        Self { vehicles }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Seed the collection (if configured) and wire repository → service.
pub async fn build_state(storage: &StorageConfig) -> Result<AppState, StartupError> {
    let initial = match &storage.seed_path {
        Some(path) => VehicleJsonFile::new(path).load().await?,
        None => {
            info!("no seed file configured; starting with an empty collection");
            Default::default()
        }
    };

    let mut repo = VehicleMap::new(initial);
    if let Some(path) = &storage.mirror_path {
        info!(%path, "mirroring vehicles to file");
        repo = repo.with_mirror(JsonMirror::new(path));
    }

    let svc: Arc<dyn VehicleService> = Arc::new(VehicleDefault::new(Arc::new(repo)));
    Ok(AppState::new(svc))
}

/// Router with CORS and tracing layers applied.
pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Public entry: load config, build the app and run the HTTP server until Ctrl+C,
/// then flush the collection once.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_or_env()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    common::env::ensure_env(&cfg.storage.data_dir, cfg.storage.seed_path.as_deref()).await?;

    let state = build_state(&cfg.storage).await?;
    let app = build_app(state.clone());

    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    info!(%addr, "starting vehicle server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = state.vehicles.flush().await {
        error!(error = %e, "final flush failed");
        return Err(e.into());
    }
    info!("server stopped");
    Ok(())
}
