//! CoconutWax configuration.
//!
//! TOML file under the platform config directory. Every section has
//! defaults, so an empty or partial file is valid.
//!
//! ```rust,no_run
//! use wax_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config.server.port);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    ContentConfig, ContentSource, DisplayConfig, LogLevel, LoggingConfig, PlatformUserAgent,
    RemoteConfig, ServerConfig, WaxConfig, CONFIG_SCHEMA_VERSION,
};

use wax_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// Creates a commented default file when none exists.
pub fn load_config() -> Result<WaxConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &WaxConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
