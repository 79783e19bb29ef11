// src/config/mod.rs

//! Configuration loading and validation for blip.
//!
//! Responsibilities:
//! - Define the optional TOML data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Merge file values with CLI flags into `WatchConfig` (`settings.rs`).
//! - Validate the result (`validate.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{default_config_path, load_for, load_from_path, load_optional};
pub use model::{ConfigFile, PortWaitSetting, RunSection, WatchSection};
pub use settings::{
    resolve, WatchConfig, DEFAULT_COMMAND, DEFAULT_EXTENSIONS, DEFAULT_INTERVAL,
    DEFAULT_RESTART_DELAY,
};
pub use validate::validate_config;
