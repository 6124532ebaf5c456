//! Route registration: module routes, system endpoints and frontend pages.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use auth::model::Role;
use auth::service::AuthService;
use luggage_core::ServiceError;
use tracking::model::TrackingStats;
use tracking::service::TrackingService;

use crate::auth_middleware::{self, AuthGate};

/// Frontend pages and the file each one serves.
const PAGES: &[(&str, &str)] = &[
    ("/", "index.html"),
    ("/login", "login.html"),
    ("/signup", "signup.html"),
    ("/sender", "sender.html"),
    ("/handler", "handler.html"),
    ("/custody", "custody.html"),
    ("/map", "map.html"),
    ("/admin", "admin-dashboard.html"),
    ("/database-viewer", "database-viewer.html"),
];

/// State for the cross-module endpoints.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub tracking: Arc<TrackingService>,
}

/// Build the complete router.
pub fn build_router(
    state: AppState,
    module_routes: Vec<(&str, Router)>,
    static_dir: Option<&Path>,
    require_auth: bool,
) -> Router {
    let gate = AuthGate {
        auth: state.auth.clone(),
        require_auth,
    };

    let mut app: Router = Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/api/stats", get(stats))
        .with_state(state);

    // Module routers carry absolute `/api/...` paths and their own state.
    for (name, router) in module_routes {
        tracing::debug!("mounting {} routes", name);
        app = app.merge(router);
    }

    if let Some(dir) = static_dir {
        app = app.merge(pages(dir));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    app.layer(middleware::from_fn_with_state(
        gate,
        auth_middleware::auth_middleware,
    ))
    .layer(cors)
}

/// Named pages plus every other file under `dir` (scripts, styles).
fn pages(dir: &Path) -> Router {
    let mut router = Router::new();
    for (route, file) in PAGES {
        router = router.route_service(route, ServeFile::new(dir.join(file)));
    }
    router.fallback_service(ServeDir::new(dir))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "luggaged",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserCounts {
    total: i64,
    senders: i64,
    handlers: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardStats {
    users: UserCounts,
    #[serde(flatten)]
    tracking: TrackingStats,
}

async fn stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, ServiceError> {
    let users = UserCounts {
        total: state.auth.count_users(None)?,
        senders: state.auth.count_users(Some(Role::Sender))?,
        handlers: state.auth.count_users(Some(Role::Handler))?,
    };
    let tracking = state.tracking.stats()?;
    Ok(Json(DashboardStats { users, tracking }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use luggage_core::Module;
    use luggage_sql::{SQLStore, SqliteStore};
    use serde_json::json;
    use tower::ServiceExt;

    use auth::service::AuthConfig;
    use auth::AuthModule;
    use tracking::TrackingModule;

    use super::*;

    fn app(static_dir: Option<&Path>, require_auth: bool) -> Router {
        let sql: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let auth = AuthModule::new(sql.clone(), AuthConfig::default()).unwrap();
        let tracking = TrackingModule::new(sql).unwrap();
        let state = AppState {
            auth: auth.service().clone(),
            tracking: tracking.service().clone(),
        };
        let modules = vec![
            (auth.name(), auth.routes()),
            (tracking.name(), tracking.routes()),
        ];
        build_router(state, modules, static_dir, require_auth)
    }

    async fn call(
        router: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header("authorization", format!("Bearer {}", t));
        }
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let body = match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        };
        let resp = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 4 * 1024 * 1024).await.unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    fn json_of(body: &str) -> serde_json::Value {
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn system_endpoints() {
        let router = app(None, false);
        let (status, body) = call(&router, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["status"], "ok");

        let (status, body) = call(&router, "GET", "/version", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["name"], "luggaged");
    }

    #[tokio::test]
    async fn stats_span_both_modules() {
        let router = app(None, false);
        call(
            &router,
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"fullname": "S", "email": "s@x.io", "password": "p", "role": "sender"})),
        )
        .await;
        call(
            &router,
            "POST",
            "/api/vehicles/add",
            None,
            Some(json!({"busColor": "red", "busType": "bus", "numberPlate": "K1"})),
        )
        .await;
        let (status, _) = call(
            &router,
            "POST",
            "/api/luggage/add",
            None,
            Some(json!({"senderId": 1, "vehicleId": 1, "color": "red", "shape": "box"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(&router, "GET", "/api/stats", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let stats = json_of(&body);
        assert_eq!(stats["users"]["total"], 1);
        assert_eq!(stats["users"]["senders"], 1);
        assert_eq!(stats["luggage"]["total"], 1);
        assert_eq!(stats["vehicles"]["total"], 1);
        assert_eq!(stats["custodyLogs"], 0);
    }

    #[tokio::test]
    async fn require_auth_guards_api() {
        let router = app(None, true);

        let (status, body) = call(&router, "GET", "/api/vehicles", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json_of(&body)["code"], "UNAUTHENTICATED");

        let (status, _) = call(&router, "GET", "/api/vehicles", Some("bogus"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(
            &router,
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"fullname": "H", "email": "h@x.io", "password": "p", "role": "handler"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = call(
            &router,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "h@x.io", "password": "p"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = json_of(&body)["token"].as_str().unwrap().to_string();

        let (status, _) = call(&router, "GET", "/api/vehicles", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        // Trackers post locations without a token; unknown luggage is still a 404.
        let (status, _) = call(
            &router,
            "POST",
            "/api/luggage/public/1/location",
            None,
            Some(json!({"lat": 0.0, "lng": 0.0})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&router, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn serves_frontend_pages() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("map.html"), "<h1>map</h1>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
        let router = app(Some(dir.path()), true);

        let (status, body) = call(&router, "GET", "/map", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>map</h1>");

        let (status, body) = call(&router, "GET", "/app.js", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("console"));

        let (status, _) = call(&router, "GET", "/sender", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
