//! Tracking module: vehicles, luggage and chain of custody.
//!
//! # Resources
//!
//! - **Vehicle**: carries up to [`slot::CAPACITY`] luggage items
//! - **Luggage**: registered on a vehicle, assigned the lowest free slot and
//!   a public ID derived from `(vehicle, slot)`, and tagged with a QR code
//! - **Custody log**: one hand-over of an item between handlers
//!
//! # Usage
//!
//! ```ignore
//! use tracking::TrackingModule;
//!
//! let module = TrackingModule::new(sql)?;
//! let router = module.routes(); // serves /api/vehicles*, /api/luggage*, /api/custody*
//! ```

pub mod api;
pub mod model;
pub mod qr;
pub mod service;
pub mod slot;

use std::sync::Arc;

use axum::Router;

use luggage_core::{Module, ServiceError};
use luggage_sql::SQLStore;

use crate::service::TrackingService;

/// Tracking module implementing the Module trait.
pub struct TrackingModule {
    service: Arc<TrackingService>,
}

impl TrackingModule {
    /// Create a new TrackingModule, initializing its tables.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        let service = TrackingService::new(sql).map_err(ServiceError::from)?;
        Ok(Self { service })
    }

    /// Get a reference to the underlying TrackingService.
    pub fn service(&self) -> &Arc<TrackingService> {
        &self.service
    }
}

impl Module for TrackingModule {
    fn name(&self) -> &str {
        "tracking"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
