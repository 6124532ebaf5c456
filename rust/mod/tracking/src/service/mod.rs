pub mod custody;
pub mod luggage;
pub mod schema;
pub mod stats;
pub mod vehicle;

use std::sync::Arc;

use thiserror::Error;

use luggage_core::ServiceError;
use luggage_sql::{Row, SQLError, SQLStore};

use crate::qr::{PayloadError, QrRenderer, RenderError, SvgQrRenderer};
use crate::slot::SlotError;

/// Tracking service error type.
#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("vehicle {vehicle_id} has no free slot")]
    CapacityExceeded { vehicle_id: i64 },

    #[error("vehicle {0} does not exist")]
    InvalidVehicle(i64),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<SQLError> for TrackingError {
    fn from(e: SQLError) -> Self {
        match e {
            SQLError::Constraint(m) => TrackingError::Conflict(m),
            other => TrackingError::Storage(other.to_string()),
        }
    }
}

impl From<PayloadError> for TrackingError {
    fn from(e: PayloadError) -> Self {
        TrackingError::Validation(e.to_string())
    }
}

impl From<RenderError> for TrackingError {
    fn from(e: RenderError) -> Self {
        TrackingError::Internal(e.to_string())
    }
}

impl From<SlotError> for TrackingError {
    fn from(e: SlotError) -> Self {
        match e {
            SlotError::InvalidVehicle(id) => TrackingError::InvalidVehicle(id),
            // Capacity is reported by the caller, which knows the vehicle.
            other => TrackingError::Internal(other.to_string()),
        }
    }
}

impl From<TrackingError> for ServiceError {
    fn from(e: TrackingError) -> Self {
        match e {
            e @ TrackingError::CapacityExceeded { .. } => ServiceError::CapacityExceeded(e.to_string()),
            e @ TrackingError::InvalidVehicle(_) => ServiceError::Validation(e.to_string()),
            TrackingError::NotFound(m) => ServiceError::NotFound(m),
            TrackingError::Conflict(m) => ServiceError::Conflict(m),
            TrackingError::Validation(m) => ServiceError::Validation(m),
            TrackingError::Storage(m) => ServiceError::Storage(m),
            TrackingError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

/// The tracking service. Owns vehicles, luggage and custody logs.
pub struct TrackingService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) qr: Box<dyn QrRenderer>,
}

impl TrackingService {
    /// Create a TrackingService that renders SVG QR codes.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Arc<Self>, TrackingError> {
        Self::with_renderer(sql, Box::new(SvgQrRenderer::default()))
    }

    /// Create a TrackingService with a custom QR renderer.
    pub fn with_renderer(
        sql: Arc<dyn SQLStore>,
        qr: Box<dyn QrRenderer>,
    ) -> Result<Arc<Self>, TrackingError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, qr }))
    }
}

pub(crate) fn missing(table: &str, col: &str) -> TrackingError {
    TrackingError::Internal(format!("{} row missing {}", table, col))
}

pub(crate) fn count(rows: &[Row]) -> i64 {
    rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0)
}
