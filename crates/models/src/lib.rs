//! Vehicle entity definitions shared by the service and server crates.

pub mod vehicle;

pub use vehicle::{Dimensions, Vehicle, VehicleAttributes, VehicleJson, VehicleMapping};
