use luggage_sql::Value;

use crate::model::{LuggageCounts, TrackingStats, VehicleCounts};
use crate::service::custody::row_to_log;
use crate::service::{count, TrackingError, TrackingService};
use crate::slot::CAPACITY;

/// Custody logs included in [`TrackingStats::recent_activity`].
const RECENT_ACTIVITY: i64 = 10;

impl TrackingService {
    /// Dashboard counters.
    pub fn stats(&self) -> Result<TrackingStats, TrackingError> {
        let luggage = LuggageCounts {
            total: count(&self.sql.query("SELECT COUNT(*) AS cnt FROM luggage", &[])?),
            located: count(&self.sql.query(
                "SELECT COUNT(*) AS cnt FROM luggage WHERE gps_lat IS NOT NULL AND gps_lng IS NOT NULL",
                &[],
            )?),
        };

        let vehicles = VehicleCounts {
            total: count(&self.sql.query("SELECT COUNT(*) AS cnt FROM vehicles", &[])?),
            full: count(&self.sql.query(
                "SELECT COUNT(*) AS cnt FROM (
                     SELECT vehicle_id FROM luggage
                     WHERE vehicle_id IS NOT NULL AND slot IS NOT NULL
                     GROUP BY vehicle_id HAVING COUNT(*) >= ?1
                 )",
                &[Value::Integer(i64::from(CAPACITY))],
            )?),
        };

        let custody_logs = count(&self.sql.query("SELECT COUNT(*) AS cnt FROM custody_logs", &[])?);
        let recent_activity = self
            .sql
            .query(
                "SELECT id, luggage_id, handler_name, company, employee_id, timestamp
                 FROM custody_logs ORDER BY timestamp DESC, id DESC LIMIT ?1",
                &[Value::Integer(RECENT_ACTIVITY)],
            )?
            .iter()
            .map(row_to_log)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TrackingStats {
            luggage,
            vehicles,
            custody_logs,
            recent_activity,
        })
    }
}
