use chrono::{DateTime, SecondsFormat, Utc};
use luggage_core::{non_empty, ListParams, ListResult};
use luggage_sql::{Row, Value};
use tracing::info;

use crate::model::{CustodyLog, NewCustodyLog};
use crate::service::{count, missing, TrackingError, TrackingService};

const CUSTODY_COLUMNS: &str = "id, luggage_id, handler_name, company, employee_id, timestamp";

impl TrackingService {
    /// Record a hand-over of a luggage item.
    pub fn add_custody_log(&self, input: NewCustodyLog) -> Result<CustodyLog, TrackingError> {
        let handler_name = input.handler_name.trim().to_string();
        if handler_name.is_empty() {
            return Err(TrackingError::Validation("handlerName is required".into()));
        }
        let luggage_id = self.custody_target(&input)?;
        let timestamp = match non_empty(input.timestamp) {
            Some(ts) => normalize_timestamp(&ts)?,
            None => format_utc(Utc::now()),
        };

        let company = non_empty(input.company);
        let employee_id = non_empty(input.employee_id);
        let id = self.sql.insert(
            "INSERT INTO custody_logs (luggage_id, handler_name, company, employee_id, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            &[
                Value::Integer(luggage_id),
                Value::Text(handler_name.clone()),
                company.clone().into(),
                employee_id.clone().into(),
                Value::Text(timestamp.clone()),
            ],
        )?;

        info!(log_id = id, luggage_id, "custody recorded");

        Ok(CustodyLog {
            id,
            luggage_id,
            handler_name,
            company,
            employee_id,
            timestamp,
        })
    }

    /// Resolve the storage id of the item a hand-over refers to.
    ///
    /// A scanned tag goes through [`TrackingService::scan`], so its first
    /// part is read as a public ID and the vehicle part is checked.
    fn custody_target(&self, input: &NewCustodyLog) -> Result<i64, TrackingError> {
        let payload = non_empty(input.payload.clone());
        let luggage = match (input.luggage_id, input.public_id, payload) {
            (Some(id), None, None) => self.get_luggage(id)?,
            (None, Some(public_id), None) => self.get_luggage_by_public_id(public_id)?,
            (None, None, Some(text)) => self.scan(&text)?.luggage,
            (None, None, None) => {
                return Err(TrackingError::Validation(
                    "one of luggageId, publicId or payload is required".into(),
                ))
            }
            _ => {
                return Err(TrackingError::Validation(
                    "give only one of luggageId, publicId or payload".into(),
                ))
            }
        };
        Ok(luggage.id)
    }

    /// All custody logs, newest first.
    pub fn list_custody_logs(
        &self,
        params: &ListParams,
    ) -> Result<ListResult<CustodyLog>, TrackingError> {
        let sql = format!(
            "SELECT {} FROM custody_logs ORDER BY timestamp DESC, id DESC LIMIT ?1 OFFSET ?2",
            CUSTODY_COLUMNS
        );
        let rows = self.sql.query(
            &sql,
            &[
                Value::Integer(params.clamped_limit() as i64),
                Value::Integer(params.offset as i64),
            ],
        )?;
        let items = rows.iter().map(row_to_log).collect::<Result<Vec<_>, _>>()?;
        let total = count(&self.sql.query("SELECT COUNT(*) AS cnt FROM custody_logs", &[])?) as usize;
        Ok(ListResult { items, total })
    }

    /// The custody chain of one item, oldest first.
    pub fn logs_for_luggage(&self, luggage_id: i64) -> Result<Vec<CustodyLog>, TrackingError> {
        self.get_luggage(luggage_id)?;
        let sql = format!(
            "SELECT {} FROM custody_logs WHERE luggage_id = ?1 ORDER BY timestamp, id",
            CUSTODY_COLUMNS
        );
        let rows = self.sql.query(&sql, &[Value::Integer(luggage_id)])?;
        rows.iter().map(row_to_log).collect()
    }
}

/// Parse any RFC 3339 timestamp and store it as fixed-width UTC, so text
/// ordering is chronological.
fn normalize_timestamp(ts: &str) -> Result<String, TrackingError> {
    DateTime::parse_from_rfc3339(ts)
        .map(|t| format_utc(t.with_timezone(&Utc)))
        .map_err(|e| TrackingError::Validation(format!("timestamp '{}': {}", ts, e)))
}

fn format_utc(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn row_to_log(row: &Row) -> Result<CustodyLog, TrackingError> {
    Ok(CustodyLog {
        id: row.get_i64("id").ok_or_else(|| missing("custody_logs", "id"))?,
        luggage_id: row
            .get_i64("luggage_id")
            .ok_or_else(|| missing("custody_logs", "luggage_id"))?,
        handler_name: row.get_str("handler_name").unwrap_or_default().to_string(),
        company: row.get_str("company").map(String::from),
        employee_id: row.get_str("employee_id").map(String::from),
        timestamp: row.get_str("timestamp").unwrap_or_default().to_string(),
    })
}
