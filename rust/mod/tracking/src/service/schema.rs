use luggage_sql::SQLStore;

use crate::service::TrackingError;
use crate::slot::CAPACITY;

/// Initialize the SQLite schema for vehicles, luggage and custody logs.
///
/// `UNIQUE (vehicle_id, slot)` and `UNIQUE (public_id)` back the allocator:
/// two writers can never both commit the same slot.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), TrackingError> {
    let luggage = format!(
        "CREATE TABLE IF NOT EXISTS luggage (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sender_id INTEGER NOT NULL,
            color TEXT NOT NULL,
            shape TEXT NOT NULL,
            description TEXT,
            vehicle_id INTEGER REFERENCES vehicles(id),
            slot INTEGER CHECK (slot BETWEEN 1 AND {capacity}),
            public_id INTEGER UNIQUE,
            qr_payload TEXT,
            qr_code TEXT,
            gps_lat REAL,
            gps_lng REAL,
            created_at TEXT NOT NULL,
            UNIQUE (vehicle_id, slot),
            CHECK ((gps_lat IS NULL) = (gps_lng IS NULL))
        )",
        capacity = CAPACITY
    );

    let statements = [
        "CREATE TABLE IF NOT EXISTS vehicles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bus_color TEXT NOT NULL,
            bus_type TEXT NOT NULL,
            number_plate TEXT NOT NULL UNIQUE,
            description TEXT,
            created_by INTEGER,
            created_at TEXT NOT NULL
        )",
        luggage.as_str(),
        "CREATE INDEX IF NOT EXISTS idx_luggage_sender ON luggage(sender_id)",
        "CREATE TABLE IF NOT EXISTS custody_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            luggage_id INTEGER NOT NULL REFERENCES luggage(id),
            handler_name TEXT NOT NULL,
            company TEXT,
            employee_id TEXT,
            timestamp TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_custody_luggage ON custody_logs(luggage_id)",
        "CREATE INDEX IF NOT EXISTS idx_custody_timestamp ON custody_logs(timestamp)",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])
            .map_err(|e| TrackingError::Storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}
