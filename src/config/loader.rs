// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::ConfigFile;
use crate::errors::{BlipError, Result};

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; merging with CLI flags and
/// validation happen in [`crate::config::resolve`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        BlipError::Config(format!("reading config file at {:?}: {e}", path))
    })?;

    let config: ConfigFile = toml::from_str(&contents)?;
    debug!(?path, "loaded config file");
    Ok(config)
}

/// Load the config file if it exists, otherwise return an empty config.
pub fn load_optional(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    if path.is_file() {
        load_from_path(path)
    } else {
        debug!(?path, "no config file; using defaults");
        Ok(ConfigFile::default())
    }
}

/// Load the config named on the command line, or the default file if present.
///
/// An explicitly named file must exist.
pub fn load_for(explicit: Option<&Path>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => load_from_path(path),
        None => load_optional(default_config_path()),
    }
}

/// `blip.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("blip.toml")
}
