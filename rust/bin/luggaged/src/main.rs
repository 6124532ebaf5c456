//! `luggaged`: the luggage tracking server binary.
//!
//! Usage:
//!   luggaged -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/luggage/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod auth_middleware;
mod bootstrap;
mod config;
mod routes;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use luggage_core::Module;
use tokio::signal::ctrl_c;
use tracing::{error, info};

use config::ServerConfig;
use routes::AppState;

/// Luggage tracking server.
#[derive(Parser, Debug)]
#[command(name = "luggaged", about = "Luggage tracking server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:5000")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    bootstrap::verify_config(&server_config)?;
    bootstrap::prepare_data_dir(&server_config)?;

    let core_config = server_config.service_config(&cli.listen);
    let sqlite_path = core_config.resolve_sqlite_path();
    info!("Opening ledger at {}", sqlite_path.display());
    let sql: Arc<dyn luggage_sql::SQLStore> = Arc::new(
        luggage_sql::SqliteStore::open(&sqlite_path)
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    let auth_module = auth::AuthModule::new(Arc::clone(&sql), server_config.auth_config())?;
    info!("Auth module initialized");

    let tracking_module = tracking::TrackingModule::new(Arc::clone(&sql))?;
    info!("Tracking module initialized");

    let state = AppState {
        auth: auth_module.service().clone(),
        tracking: tracking_module.service().clone(),
    };
    let module_routes = vec![
        (auth_module.name(), auth_module.routes()),
        (tracking_module.name(), tracking_module.routes()),
    ];

    let static_dir = server_config.web.static_dir.as_deref().map(Path::new);
    if server_config.web.require_auth {
        info!("Bearer tokens required on /api");
    }
    let app = routes::build_router(
        state,
        module_routes,
        static_dir,
        server_config.web.require_auth,
    );

    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("Luggage server listening on {}", core_config.listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("cannot listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
