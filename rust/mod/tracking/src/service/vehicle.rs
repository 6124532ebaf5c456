use luggage_core::{non_empty, now_rfc3339};
use luggage_sql::{Row, Value};
use tracing::info;

use crate::model::{Manifest, NewVehicle, SlotEntry, Vehicle};
use crate::service::{missing, TrackingError, TrackingService};
use crate::slot::CAPACITY;

const VEHICLE_COLUMNS: &str = "id, bus_color, bus_type, number_plate, description, created_by, created_at";

impl TrackingService {
    /// Register a vehicle. Plates are unique after trimming and upper-casing.
    pub fn create_vehicle(&self, input: NewVehicle) -> Result<Vehicle, TrackingError> {
        let bus_color = input.bus_color.trim().to_string();
        let bus_type = input.bus_type.trim().to_string();
        let number_plate = normalize_plate(&input.number_plate);
        if number_plate.is_empty() {
            return Err(TrackingError::Validation("numberPlate is required".into()));
        }
        if bus_color.is_empty() || bus_type.is_empty() {
            return Err(TrackingError::Validation(
                "busColor and busType are required".into(),
            ));
        }
        let description = non_empty(input.description);
        let now = now_rfc3339();

        let id = self
            .sql
            .insert(
                "INSERT INTO vehicles (bus_color, bus_type, number_plate, description, created_by, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                &[
                    Value::Text(bus_color.clone()),
                    Value::Text(bus_type.clone()),
                    Value::Text(number_plate.clone()),
                    description.clone().into(),
                    input.created_by.into(),
                    Value::Text(now.clone()),
                ],
            )
            .map_err(|e| match TrackingError::from(e) {
                TrackingError::Conflict(_) => TrackingError::Conflict(format!(
                    "vehicle with plate {} already exists",
                    number_plate
                )),
                other => other,
            })?;

        info!(vehicle_id = id, plate = %number_plate, "registered vehicle");

        Ok(Vehicle {
            id,
            bus_color,
            bus_type,
            number_plate,
            description,
            created_by: input.created_by,
            created_at: now,
        })
    }

    pub fn get_vehicle(&self, id: i64) -> Result<Vehicle, TrackingError> {
        self.find_vehicle(id)?
            .ok_or_else(|| TrackingError::NotFound(format!("vehicle {} not found", id)))
    }

    pub(crate) fn find_vehicle(&self, id: i64) -> Result<Option<Vehicle>, TrackingError> {
        let sql = format!("SELECT {} FROM vehicles WHERE id = ?1", VEHICLE_COLUMNS);
        let rows = self.sql.query(&sql, &[Value::Integer(id)])?;
        rows.first().map(row_to_vehicle).transpose()
    }

    /// All vehicles, newest first.
    pub fn list_vehicles(&self) -> Result<Vec<Vehicle>, TrackingError> {
        let sql = format!(
            "SELECT {} FROM vehicles ORDER BY id DESC",
            VEHICLE_COLUMNS
        );
        let rows = self.sql.query(&sql, &[])?;
        rows.iter().map(row_to_vehicle).collect()
    }

    /// Slot occupancy for one vehicle.
    pub fn vehicle_manifest(&self, id: i64) -> Result<Manifest, TrackingError> {
        let vehicle = self.get_vehicle(id)?;
        let rows = self.sql.query(
            "SELECT id, slot, public_id, color, shape FROM luggage
             WHERE vehicle_id = ?1 AND slot IS NOT NULL
             ORDER BY slot",
            &[Value::Integer(id)],
        )?;

        let slots = rows
            .iter()
            .map(|row| {
                Ok(SlotEntry {
                    slot: row.get_i64("slot").ok_or_else(|| missing("luggage", "slot"))? as u32,
                    luggage_id: row.get_i64("id").ok_or_else(|| missing("luggage", "id"))?,
                    public_id: row
                        .get_i64("public_id")
                        .ok_or_else(|| missing("luggage", "public_id"))?,
                    color: row.get_str("color").unwrap_or_default().to_string(),
                    shape: row.get_str("shape").unwrap_or_default().to_string(),
                })
            })
            .collect::<Result<Vec<_>, TrackingError>>()?;

        let occupied = slots.len() as u32;
        Ok(Manifest {
            vehicle,
            capacity: CAPACITY,
            occupied,
            free: CAPACITY.saturating_sub(occupied),
            slots,
        })
    }
}

fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

fn row_to_vehicle(row: &Row) -> Result<Vehicle, TrackingError> {
    Ok(Vehicle {
        id: row.get_i64("id").ok_or_else(|| missing("vehicles", "id"))?,
        bus_color: row.get_str("bus_color").unwrap_or_default().to_string(),
        bus_type: row.get_str("bus_type").unwrap_or_default().to_string(),
        number_plate: row
            .get_str("number_plate")
            .ok_or_else(|| missing("vehicles", "number_plate"))?
            .to_string(),
        description: row.get_str("description").map(String::from),
        created_by: row.get_i64("created_by"),
        created_at: row.get_str("created_at").unwrap_or_default().to_string(),
    })
}
