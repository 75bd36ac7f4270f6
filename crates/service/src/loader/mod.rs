//! Startup loader for the vehicle collection.

use std::path::PathBuf;

use models::{VehicleJson, VehicleMapping};
use tracing::{info, warn};

use crate::errors::ServiceError;

/// Reads a JSON array of flat vehicle objects.
#[derive(Clone, Debug)]
pub struct VehicleJsonFile {
    path: PathBuf,
}

impl VehicleJsonFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Parse the file into a mapping keyed by each element's declared id.
    /// Ids are taken verbatim; a repeated id keeps the later element.
    pub async fn load(&self) -> Result<VehicleMapping, ServiceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| ServiceError::Read { path: self.path.clone(), source })?;
        let rows: Vec<VehicleJson> = serde_json::from_slice(&bytes)?;

        let mut mapping = VehicleMapping::new();
        for row in rows {
            let vehicle = row.into_vehicle();
            if mapping.insert(vehicle.id, vehicle).is_some() {
                warn!(path = %self.path.display(), "duplicate vehicle id in seed file; keeping the later entry");
            }
        }
        info!(path = %self.path.display(), count = mapping.len(), "vehicles loaded");
        Ok(mapping)
    }
}
