use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use luggage_core::ServiceError;

use crate::api::AppState;
use crate::model::{Credentials, LoginResponse, Signup, User};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

async fn signup(
    State(svc): State<AppState>,
    Json(input): Json<Signup>,
) -> Result<(StatusCode, Json<User>), ServiceError> {
    let user = svc.signup(input).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(svc): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<LoginResponse>, ServiceError> {
    svc.login(&credentials).map(Json).map_err(ServiceError::from)
}
