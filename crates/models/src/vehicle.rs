use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Records keyed by identifier, ascending.
pub type VehicleMapping = BTreeMap<i64, Vehicle>;

/// Physical size of a vehicle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Dimensions {
    pub height: f64,
    pub length: f64,
    pub width: f64,
}

/// Everything that describes a vehicle except its identifier.
/// This is what callers hand to the repository on insert.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VehicleAttributes {
    pub brand: String,
    pub model: String,
    pub registration: String,
    pub color: String,
    pub fabrication_year: i32,
    pub capacity: i32,
    pub max_speed: f64,
    pub fuel_type: String,
    pub transmission: String,
    pub weight: f64,
    pub dimensions: Dimensions,
}

/// A stored vehicle record.
#[derive(Clone, Debug, PartialEq)]
pub struct Vehicle {
    pub id: i64,
    pub attributes: VehicleAttributes,
}

impl Vehicle {
    pub fn new(id: i64, attributes: VehicleAttributes) -> Self {
        Self { id, attributes }
    }
}

/// Flat JSON shape used on the wire and in seed/mirror files.
///
/// Missing keys fall back to zero values so partial request bodies still
/// decode; a key with the wrong type is a decode error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleJson {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub registration: String,
    pub color: String,
    pub year: i32,
    pub passengers: i32,
    pub max_speed: f64,
    pub fuel_type: String,
    pub transmission: String,
    pub weight: f64,
    pub height: f64,
    pub length: f64,
    pub width: f64,
}

impl VehicleJson {
    /// Drop the identifier and nest the dimension fields.
    pub fn into_attributes(self) -> VehicleAttributes {
        VehicleAttributes {
            brand: self.brand,
            model: self.model,
            registration: self.registration,
            color: self.color,
            fabrication_year: self.year,
            capacity: self.passengers,
            max_speed: self.max_speed,
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            weight: self.weight,
            dimensions: Dimensions {
                height: self.height,
                length: self.length,
                width: self.width,
            },
        }
    }

    /// Keep the declared identifier; used when trusting file contents.
    pub fn into_vehicle(self) -> Vehicle {
        let id = self.id;
        Vehicle::new(id, self.into_attributes())
    }
}

impl From<&Vehicle> for VehicleJson {
    fn from(v: &Vehicle) -> Self {
        let a = &v.attributes;
        Self {
            id: v.id,
            brand: a.brand.clone(),
            model: a.model.clone(),
            registration: a.registration.clone(),
            color: a.color.clone(),
            year: a.fabrication_year,
            passengers: a.capacity,
            max_speed: a.max_speed,
            fuel_type: a.fuel_type.clone(),
            transmission: a.transmission.clone(),
            weight: a.weight,
            height: a.dimensions.height,
            length: a.dimensions.length,
            width: a.dimensions.width,
        }
    }
}

/// Re-flatten a whole mapping for responses, keeping the keys.
pub fn to_wire(mapping: &VehicleMapping) -> BTreeMap<i64, VehicleJson> {
    mapping.iter().map(|(id, v)| (*id, VehicleJson::from(v))).collect()
}
