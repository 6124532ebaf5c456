use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Stable error code constants.
///
/// Clients match on `code` in `{"code": "CAPACITY_EXCEEDED", "message": "..."}`,
/// never on the message text.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const CAPACITY_EXCEEDED: &str = "CAPACITY_EXCEEDED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const INTERNAL: &str = "INTERNAL";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
}

/// Error type every module converts into at the HTTP boundary.
///
/// ```json
/// {"code": "NOT_FOUND", "message": "luggage with public id 45 not found"}
/// ```
#[derive(Error, Debug)]
pub enum ServiceError {
    /// 404.
    #[error("{0}")]
    NotFound(String),

    /// Unique key already taken. 409.
    #[error("{0}")]
    Conflict(String),

    /// 400.
    #[error("{0}")]
    Validation(String),

    /// A vehicle (or any bounded resource) has no room left. 422.
    #[error("{0}")]
    CapacityExceeded(String),

    /// Missing or bad credentials. 401.
    #[error("{0}")]
    Unauthorized(String),

    /// 500.
    #[error("{0}")]
    Storage(String),

    /// 500.
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'static str,
    message: &'a str,
}

impl ServiceError {
    fn parts(&self) -> (StatusCode, &'static str) {
        use error_code::*;
        match self {
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, NOT_FOUND),
            ServiceError::Conflict(_) => (StatusCode::CONFLICT, ALREADY_EXISTS),
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, VALIDATION_FAILED),
            ServiceError::CapacityExceeded(_) => (StatusCode::UNPROCESSABLE_ENTITY, CAPACITY_EXCEEDED),
            ServiceError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, UNAUTHENTICATED),
            ServiceError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, STORAGE_ERROR),
            ServiceError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL),
        }
    }

    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        self.parts().1
    }

    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(code, "{}", message);
        }
        let body = ErrorBody {
            code,
            message: &message,
        };
        (status, axum::Json(body)).into_response()
    }
}
