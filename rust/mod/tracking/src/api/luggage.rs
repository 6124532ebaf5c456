use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use luggage_core::{ListParams, ListResult, ServiceError};

use crate::api::AppState;
use crate::model::{CreatedLuggage, GeoPoint, Luggage, LuggageRef, NewLuggage, ScanResult};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/luggage", get(list_luggage))
        .route("/luggage/add", post(create_luggage))
        .route("/luggage/id/{id}", get(get_by_id))
        .route("/luggage/public/{public_id}", get(get_by_public_id))
        .route("/luggage/public/{public_id}/location", post(locate_by_public_id))
        .route("/luggage/by-sender/{sender_id}", get(list_by_sender))
        .route("/luggage/located", get(list_located))
        .route("/luggage/update-location/{id}", post(locate_by_id))
        .route("/luggage/scan", post(scan))
}

#[derive(Debug, Deserialize)]
struct ScanRequest {
    payload: String,
}

#[derive(Debug, Serialize)]
struct Ack {
    message: &'static str,
}

const LOCATION_UPDATED: Ack = Ack {
    message: "location updated",
};

async fn list_luggage(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<ListResult<Luggage>, ServiceError> {
    svc.list_luggage(&params).map_err(ServiceError::from)
}

async fn create_luggage(
    State(svc): State<AppState>,
    Json(input): Json<NewLuggage>,
) -> Result<(StatusCode, Json<CreatedLuggage>), ServiceError> {
    let created = svc.create_luggage(input).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_by_id(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Luggage>, ServiceError> {
    svc.get_luggage(id).map(Json).map_err(ServiceError::from)
}

async fn get_by_public_id(
    State(svc): State<AppState>,
    Path(public_id): Path<i64>,
) -> Result<Json<Luggage>, ServiceError> {
    svc.get_luggage_by_public_id(public_id)
        .map(Json)
        .map_err(ServiceError::from)
}

async fn locate_by_id(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
    Json(point): Json<GeoPoint>,
) -> Result<Json<Ack>, ServiceError> {
    svc.update_location(LuggageRef::Id(id), point)
        .map_err(ServiceError::from)?;
    Ok(Json(LOCATION_UPDATED))
}

async fn locate_by_public_id(
    State(svc): State<AppState>,
    Path(public_id): Path<i64>,
    Json(point): Json<GeoPoint>,
) -> Result<Json<Ack>, ServiceError> {
    svc.update_location(LuggageRef::Public(public_id), point)
        .map_err(ServiceError::from)?;
    Ok(Json(LOCATION_UPDATED))
}

async fn list_by_sender(
    State(svc): State<AppState>,
    Path(sender_id): Path<i64>,
) -> Result<Json<Vec<Luggage>>, ServiceError> {
    svc.list_by_sender(sender_id).map(Json).map_err(ServiceError::from)
}

async fn list_located(State(svc): State<AppState>) -> Result<Json<Vec<Luggage>>, ServiceError> {
    svc.list_located().map(Json).map_err(ServiceError::from)
}

async fn scan(
    State(svc): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<ScanResult>, ServiceError> {
    svc.scan(&req.payload).map(Json).map_err(ServiceError::from)
}
