use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use luggage_core::{ListParams, ListResult, ServiceError};

use crate::api::AppState;
use crate::model::{CustodyLog, NewCustodyLog};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/custody", get(list_logs))
        .route("/custody/add", post(add_log))
        .route("/custody/by-luggage/{luggage_id}", get(logs_for_luggage))
}

async fn list_logs(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<ListResult<CustodyLog>, ServiceError> {
    svc.list_custody_logs(&params).map_err(ServiceError::from)
}

async fn add_log(
    State(svc): State<AppState>,
    Json(input): Json<NewCustodyLog>,
) -> Result<(StatusCode, Json<CustodyLog>), ServiceError> {
    let log = svc.add_custody_log(input).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(log)))
}

async fn logs_for_luggage(
    State(svc): State<AppState>,
    Path(luggage_id): Path<i64>,
) -> Result<Json<Vec<CustodyLog>>, ServiceError> {
    svc.logs_for_luggage(luggage_id).map(Json).map_err(ServiceError::from)
}
