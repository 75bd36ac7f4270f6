use std::sync::Arc;

use async_trait::async_trait;
use models::{Vehicle, VehicleAttributes, VehicleMapping};
use tracing::instrument;

use crate::errors::ServiceError;
use crate::vehicle::repository::VehicleRepository;

/// Capability set the HTTP layer depends on.
#[async_trait]
pub trait VehicleService: Send + Sync {
    async fn find_all(&self) -> Result<VehicleMapping, ServiceError>;
    async fn add_vehicle(&self, attributes: VehicleAttributes) -> Result<Vehicle, ServiceError>;
    async fn get_by_color_and_year(&self, color: &str, year: i32) -> Result<VehicleMapping, ServiceError>;
    async fn flush(&self) -> Result<(), ServiceError>;
}

/// Default service: forwards every call to the repository unchanged.
pub struct VehicleDefault<R: VehicleRepository> {
    repo: Arc<R>,
}

impl<R: VehicleRepository> VehicleDefault<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: VehicleRepository> VehicleService for VehicleDefault<R> {
    async fn find_all(&self) -> Result<VehicleMapping, ServiceError> {
        self.repo.find_all().await
    }

    #[instrument(skip_all)]
    async fn add_vehicle(&self, attributes: VehicleAttributes) -> Result<Vehicle, ServiceError> {
        self.repo.add_vehicle(attributes).await
    }

    async fn get_by_color_and_year(&self, color: &str, year: i32) -> Result<VehicleMapping, ServiceError> {
        self.repo.get_by_color_and_year(color, year).await
    }

    async fn flush(&self) -> Result<(), ServiceError> {
        self.repo.flush().await
    }
}
