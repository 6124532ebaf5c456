use serde::{Deserialize, Serialize};

/// A vehicle that carries luggage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i64,
    pub bus_color: String,
    pub bus_type: String,
    /// Unique, stored trimmed and upper-cased.
    pub number_plate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User who registered the vehicle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
    pub created_at: String,
}

/// Returned once a vehicle has been registered: the vehicle plus its id
/// under `vehicleId`, the name registration clients read it from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedVehicle {
    pub vehicle_id: i64,
    #[serde(flatten)]
    pub vehicle: Vehicle,
}

impl From<Vehicle> for CreatedVehicle {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            vehicle_id: vehicle.id,
            vehicle,
        }
    }
}

/// Request body for registering a vehicle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    pub bus_color: String,
    pub bus_type: String,
    pub number_plate: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_by: Option<i64>,
}

/// One occupied slot in a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotEntry {
    pub slot: u32,
    pub luggage_id: i64,
    pub public_id: i64,
    pub color: String,
    pub shape: String,
}

/// Slot occupancy for one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub vehicle: Vehicle,
    pub capacity: u32,
    pub occupied: u32,
    pub free: u32,
    /// Occupied slots, ascending.
    pub slots: Vec<SlotEntry>,
}
