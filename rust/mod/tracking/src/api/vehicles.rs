use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use luggage_core::ServiceError;

use crate::api::AppState;
use crate::model::{CreatedVehicle, Manifest, NewVehicle, Vehicle};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route("/vehicles/add", post(create_vehicle))
        .route("/vehicles/{id}", get(get_vehicle))
        .route("/vehicles/{id}/manifest", get(manifest))
}

async fn list_vehicles(State(svc): State<AppState>) -> Result<Json<Vec<Vehicle>>, ServiceError> {
    svc.list_vehicles().map(Json).map_err(ServiceError::from)
}

async fn create_vehicle(
    State(svc): State<AppState>,
    Json(input): Json<NewVehicle>,
) -> Result<(StatusCode, Json<CreatedVehicle>), ServiceError> {
    let vehicle = svc.create_vehicle(input).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(vehicle.into())))
}

async fn get_vehicle(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vehicle>, ServiceError> {
    svc.get_vehicle(id).map(Json).map_err(ServiceError::from)
}

async fn manifest(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Manifest>, ServiceError> {
    svc.vehicle_manifest(id).map(Json).map_err(ServiceError::from)
}
