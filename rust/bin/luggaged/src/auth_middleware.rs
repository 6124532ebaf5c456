//! JWT authentication middleware.
//!
//! When enabled, extracts the JWT from `Authorization: Bearer <token>`,
//! validates it with the auth service, and provides `Claims` to downstream
//! handlers.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use auth::service::AuthService;
use luggage_core::ServiceError;

/// Middleware state.
#[derive(Clone)]
pub struct AuthGate {
    pub auth: Arc<AuthService>,
    /// When false every request passes through untouched.
    pub require_auth: bool,
}

pub async fn auth_middleware(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    if !gate.require_auth || is_public_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ServiceError::Unauthorized("missing authorization token".into()))?;

    let claims = gate.auth.verify_token(token).map_err(ServiceError::from)?;
    debug!(sub = %claims.sub, role = %claims.role, "authenticated request");
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Paths reachable without a token.
///
/// Everything outside `/api/` (pages, health, assets) is public, as are
/// signup/login and the two location-update endpoints used by trackers.
fn is_public_path(path: &str) -> bool {
    if !path.starts_with("/api/") {
        return true;
    }
    matches!(path, "/api/auth/login" | "/api/auth/signup")
        || path.starts_with("/api/luggage/update-location/")
        || (path.starts_with("/api/luggage/public/") && path.ends_with("/location"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        for path in [
            "/",
            "/map",
            "/health",
            "/js/app.js",
            "/api/auth/login",
            "/api/auth/signup",
            "/api/luggage/update-location/4",
            "/api/luggage/public/45/location",
        ] {
            assert!(is_public_path(path), "{} should be public", path);
        }
    }

    #[test]
    fn test_protected_paths() {
        for path in [
            "/api/users",
            "/api/auth/users",
            "/api/luggage/add",
            "/api/luggage/public/45",
            "/api/vehicles",
            "/api/stats",
        ] {
            assert!(!is_public_path(path), "{} should be protected", path);
        }
    }
}
