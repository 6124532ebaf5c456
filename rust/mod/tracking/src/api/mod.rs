mod custody;
mod luggage;
mod vehicles;

use std::sync::Arc;

use axum::Router;

use crate::service::TrackingService;

/// Shared application state.
pub type AppState = Arc<TrackingService>;

/// Build the tracking API router, serving `/api/vehicles*`, `/api/luggage*`
/// and `/api/custody*`.
pub fn build_router(svc: Arc<TrackingService>) -> Router {
    let api = Router::new()
        .merge(vehicles::routes())
        .merge(luggage::routes())
        .merge(custody::routes());

    Router::new().nest("/api", api).with_state(svc)
}
