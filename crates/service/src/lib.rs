//! Service layer for the vehicle registry.
//! - `vehicle::repository` defines the data-access contract, `vehicle::memory` implements it.
//! - `vehicle::service` is the seam handlers depend on.
//! - `loader` seeds the collection at startup, `storage` mirrors it to disk.

pub mod errors;
pub mod loader;
pub mod storage;
pub mod vehicle;
