use async_trait::async_trait;
use models::{Vehicle, VehicleAttributes, VehicleMapping};

use crate::errors::ServiceError;

/// Data-access contract for the vehicle collection.
///
/// Implementations own the collection exclusively; every read hands back an
/// owned copy, and identifiers are assigned by the implementation on insert.
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Every stored record, keyed by id.
    async fn find_all(&self) -> Result<VehicleMapping, ServiceError>;

    /// Store a new record under a freshly assigned id and return it.
    async fn add_vehicle(&self, attributes: VehicleAttributes) -> Result<Vehicle, ServiceError>;

    /// Records with exactly this color (case-sensitive) and fabrication year.
    /// No match is an empty mapping, not an error.
    async fn get_by_color_and_year(&self, color: &str, year: i32) -> Result<VehicleMapping, ServiceError>;

    /// Push current state to any backing store. Called once on shutdown.
    async fn flush(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}
