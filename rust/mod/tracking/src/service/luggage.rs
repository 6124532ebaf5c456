use luggage_core::{non_empty, now_rfc3339, ListParams, ListResult};
use luggage_sql::{Row, Value};
use tracing::{debug, info, warn};

use crate::model::{
    CreatedLuggage, GeoPoint, Luggage, LuggageRef, NewLuggage, ScanResult,
};
use crate::qr::QrPayload;
use crate::service::{count, missing, TrackingError, TrackingService};
use crate::slot::{allocate_slot, derive_public_id, SlotError};

const LUGGAGE_COLUMNS: &str = "id, sender_id, color, shape, description, vehicle_id, slot, \
                               public_id, qr_payload, qr_code, gps_lat, gps_lng, created_at";

/// How many times a registration is retried after losing a slot race.
const MAX_ALLOCATION_ATTEMPTS: usize = 3;

impl TrackingService {
    /// Register a luggage item on a vehicle.
    ///
    /// The slot read, public ID derivation and insert run in one write
    /// transaction, so concurrent registrations on the same vehicle each get
    /// a distinct slot and a full vehicle never gains a 21st item. A
    /// uniqueness violation (another process won the slot) is retried.
    pub fn create_luggage(&self, input: NewLuggage) -> Result<CreatedLuggage, TrackingError> {
        let input = NewLuggage {
            color: input.color.trim().to_string(),
            shape: input.shape.trim().to_string(),
            description: non_empty(input.description),
            ..input
        };

        let mut attempt = 1;
        loop {
            match self.try_create_luggage(&input) {
                Err(TrackingError::Conflict(msg)) if attempt < MAX_ALLOCATION_ATTEMPTS => {
                    warn!(vehicle_id = input.vehicle_id, attempt, "slot allocation raced: {}", msg);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    fn try_create_luggage(&self, input: &NewLuggage) -> Result<CreatedLuggage, TrackingError> {
        let vehicle_id = input.vehicle_id;
        let tx = self.sql.begin()?;

        let vehicle = tx.query("SELECT id FROM vehicles WHERE id = ?1", &[Value::Integer(vehicle_id)])?;
        if vehicle.is_empty() {
            return Err(TrackingError::InvalidVehicle(vehicle_id));
        }

        let taken = tx.query(
            "SELECT slot FROM luggage WHERE vehicle_id = ?1 AND slot IS NOT NULL",
            &[Value::Integer(vehicle_id)],
        )?;
        let slot = allocate_slot(
            taken
                .iter()
                .filter_map(|r| r.get_i64("slot"))
                .map(|s| s as u32),
        )
        .map_err(|e| match e {
            SlotError::CapacityExceeded { .. } => TrackingError::CapacityExceeded { vehicle_id },
            other => other.into(),
        })?;

        let public_id = derive_public_id(vehicle_id, slot)?;
        let qr_payload = QrPayload::new(public_id, vehicle_id).encode();
        let qr_code = self.qr.render(&qr_payload)?;

        let luggage_id = tx.insert(
            "INSERT INTO luggage (sender_id, color, shape, description, vehicle_id, slot,
                                  public_id, qr_payload, qr_code, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            &[
                Value::Integer(input.sender_id),
                Value::Text(input.color.clone()),
                Value::Text(input.shape.clone()),
                input.description.clone().into(),
                Value::Integer(vehicle_id),
                Value::Integer(i64::from(slot)),
                Value::Integer(public_id),
                Value::Text(qr_payload.clone()),
                Value::Text(qr_code.clone()),
                Value::Text(now_rfc3339()),
            ],
        )?;
        tx.commit()?;

        info!(luggage_id, vehicle_id, slot, public_id, "registered luggage");

        Ok(CreatedLuggage {
            luggage_id,
            vehicle_id,
            slot,
            public_id,
            qr_payload,
            qr_code,
        })
    }

    /// Look up a luggage item by storage id or public ID.
    pub fn resolve_luggage(&self, by: LuggageRef) -> Result<Luggage, TrackingError> {
        let (column, key, label) = lookup(by);
        let sql = format!("SELECT {} FROM luggage WHERE {} = ?1", LUGGAGE_COLUMNS, column);
        let rows = self.sql.query(&sql, &[Value::Integer(key)])?;
        rows.first()
            .map(row_to_luggage)
            .transpose()?
            .ok_or_else(|| TrackingError::NotFound(format!("{} {} not found", label, key)))
    }

    pub fn get_luggage(&self, id: i64) -> Result<Luggage, TrackingError> {
        self.resolve_luggage(LuggageRef::Id(id))
    }

    pub fn get_luggage_by_public_id(&self, public_id: i64) -> Result<Luggage, TrackingError> {
        self.resolve_luggage(LuggageRef::Public(public_id))
    }

    /// Overwrite the last known location of a luggage item.
    pub fn update_location(&self, by: LuggageRef, point: GeoPoint) -> Result<(), TrackingError> {
        point.validate().map_err(TrackingError::Validation)?;

        let (column, key, label) = lookup(by);
        let sql = format!("UPDATE luggage SET gps_lat = ?1, gps_lng = ?2 WHERE {} = ?3", column);
        let affected = self.sql.exec(
            &sql,
            &[
                Value::Real(point.latitude),
                Value::Real(point.longitude),
                Value::Integer(key),
            ],
        )?;
        if affected == 0 {
            return Err(TrackingError::NotFound(format!("{} {} not found", label, key)));
        }

        debug!(?by, lat = point.latitude, lng = point.longitude, "location updated");
        Ok(())
    }

    /// Resolve a scanned QR payload.
    ///
    /// A two-part payload must name the vehicle the item is actually on.
    pub fn scan(&self, text: &str) -> Result<ScanResult, TrackingError> {
        let payload = QrPayload::decode(text)?;
        let luggage = self.get_luggage_by_public_id(payload.public_id)?;

        if let Some(scanned_vehicle) = payload.vehicle_id {
            if luggage.vehicle_id != Some(scanned_vehicle) {
                return Err(TrackingError::Validation(format!(
                    "tag names vehicle {} but luggage {} is on {}",
                    scanned_vehicle,
                    payload.public_id,
                    luggage
                        .vehicle_id
                        .map(|v| format!("vehicle {}", v))
                        .unwrap_or_else(|| "no vehicle".into()),
                )));
            }
        }

        let vehicle = match luggage.vehicle_id {
            Some(id) => self.find_vehicle(id)?,
            None => None,
        };
        Ok(ScanResult { luggage, vehicle })
    }

    /// All luggage, newest first.
    pub fn list_luggage(&self, params: &ListParams) -> Result<ListResult<Luggage>, TrackingError> {
        let sql = format!(
            "SELECT {} FROM luggage ORDER BY id DESC LIMIT ?1 OFFSET ?2",
            LUGGAGE_COLUMNS
        );
        let rows = self.sql.query(
            &sql,
            &[
                Value::Integer(params.clamped_limit() as i64),
                Value::Integer(params.offset as i64),
            ],
        )?;
        let items = rows.iter().map(row_to_luggage).collect::<Result<Vec<_>, _>>()?;
        let total = count(&self.sql.query("SELECT COUNT(*) AS cnt FROM luggage", &[])?) as usize;
        Ok(ListResult { items, total })
    }

    /// Luggage registered by one sender, newest first.
    pub fn list_by_sender(&self, sender_id: i64) -> Result<Vec<Luggage>, TrackingError> {
        let sql = format!(
            "SELECT {} FROM luggage WHERE sender_id = ?1 ORDER BY id DESC",
            LUGGAGE_COLUMNS
        );
        let rows = self.sql.query(&sql, &[Value::Integer(sender_id)])?;
        rows.iter().map(row_to_luggage).collect()
    }

    /// Luggage with a reported location, for the map.
    pub fn list_located(&self) -> Result<Vec<Luggage>, TrackingError> {
        let sql = format!(
            "SELECT {} FROM luggage WHERE gps_lat IS NOT NULL AND gps_lng IS NOT NULL ORDER BY id",
            LUGGAGE_COLUMNS
        );
        let rows = self.sql.query(&sql, &[])?;
        rows.iter().map(row_to_luggage).collect()
    }
}

fn lookup(by: LuggageRef) -> (&'static str, i64, &'static str) {
    match by {
        LuggageRef::Id(id) => ("id", id, "luggage"),
        LuggageRef::Public(public_id) => ("public_id", public_id, "luggage with public id"),
    }
}

fn row_to_luggage(row: &Row) -> Result<Luggage, TrackingError> {
    // The schema pairs the columns; a half-written fix reads as no fix.
    let (gps_lat, gps_lng) = match (row.get_f64("gps_lat"), row.get_f64("gps_lng")) {
        (Some(lat), Some(lng)) => (Some(lat), Some(lng)),
        _ => (None, None),
    };
    Ok(Luggage {
        id: row.get_i64("id").ok_or_else(|| missing("luggage", "id"))?,
        sender_id: row
            .get_i64("sender_id")
            .ok_or_else(|| missing("luggage", "sender_id"))?,
        color: row.get_str("color").unwrap_or_default().to_string(),
        shape: row.get_str("shape").unwrap_or_default().to_string(),
        description: row.get_str("description").map(String::from),
        vehicle_id: row.get_i64("vehicle_id"),
        slot: row.get_i64("slot").map(|s| s as u32),
        public_id: row.get_i64("public_id"),
        qr_payload: row.get_str("qr_payload").map(String::from),
        qr_code: row.get_str("qr_code").map(String::from),
        gps_lat,
        gps_lng,
        created_at: row.get_str("created_at").unwrap_or_default().to_string(),
    })
}
