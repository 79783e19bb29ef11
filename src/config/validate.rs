// src/config/validate.rs

use crate::config::settings::WatchConfig;
use crate::errors::{BlipError, Result};

/// Run basic sanity checks against resolved settings.
///
/// This checks:
/// - the watch root is not an empty path
/// - at least one extension is watched
///
/// It does **not** check that the root exists; the initial scan reports that.
pub fn validate_config(cfg: &WatchConfig) -> Result<()> {
    if cfg.root.as_os_str().is_empty() {
        return Err(BlipError::Config("watch root must not be empty".to_string()));
    }

    if cfg.extensions.is_empty() {
        return Err(BlipError::Config(
            "at least one file extension must be watched".to_string(),
        ));
    }

    if cfg.interval.is_zero() {
        return Err(BlipError::Config("poll interval must be > 0".to_string()));
    }

    Ok(())
}
