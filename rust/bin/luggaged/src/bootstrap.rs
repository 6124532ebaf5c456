//! First-start checks.
//!
//! When luggaged starts:
//! 1. Verify the config is usable; refuse to start otherwise.
//! 2. Create the data directory.

use std::path::Path;

use tracing::{info, warn};

use crate::config::ServerConfig;

/// Secret shipped in the dev defaults; never acceptable in a config file.
const DEV_SECRET: &str = "luggage-dev-secret-change-me";

/// Verify server configuration is ready for use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.jwt.secret == DEV_SECRET {
        anyhow::bail!("JWT secret is the development default; set [jwt] secret.");
    }
    if config.jwt.expire_secs <= 0 {
        anyhow::bail!("[jwt] expire_secs must be positive.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    if let Some(dir) = &config.web.static_dir {
        if !Path::new(dir).is_dir() {
            warn!("static_dir {} does not exist, pages will 404", dir);
        }
    }
    Ok(())
}

/// Create the data directory if needed.
pub fn prepare_data_dir(config: &ServerConfig) -> anyhow::Result<()> {
    let dir = Path::new(&config.storage.data_dir);
    std::fs::create_dir_all(dir)
        .map_err(|e| anyhow::anyhow!("cannot create data dir {}: {}", dir.display(), e))?;
    info!("Data directory: {}", dir.display());
    Ok(())
}
