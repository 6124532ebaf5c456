use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use luggage_core::{ListParams, ListResult, ServiceError};

use crate::api::AppState;
use crate::model::User;

/// `/users/{id}` and `/users`, nested under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
}

/// `/users` alone, nested under `/api/auth`.
pub fn list_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

async fn list_users(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<ListResult<User>, ServiceError> {
    svc.list_users(&params).map_err(ServiceError::from)
}

async fn get_user(
    State(svc): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ServiceError> {
    svc.get_user(id).map(Json).map_err(ServiceError::from)
}
