pub mod memory;
pub mod repository;
pub mod service;

pub use memory::VehicleMap;
pub use repository::VehicleRepository;
pub use service::{VehicleDefault, VehicleService};
