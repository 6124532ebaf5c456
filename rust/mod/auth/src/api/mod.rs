mod session;
mod users;

use std::sync::Arc;

use axum::Router;

use crate::service::AuthService;

/// Shared application state.
pub type AppState = Arc<AuthService>;

/// Build the auth API router.
///
/// Serves `/api/auth/*` (signup, login, user list) and `/api/users*`.
pub fn build_router(svc: Arc<AuthService>) -> Router {
    let auth = Router::new()
        .merge(session::routes())
        .merge(users::list_routes());

    Router::new()
        .nest("/api/auth", auth)
        .nest("/api", users::routes())
        .with_state(svc)
}
