//! Config resolution for the binary: file, then command-line overrides.

use std::path::Path;

use wax_common::ConfigError;
use wax_config::{toml_loader, validation, WaxConfig};

use crate::cli::Args;

/// Load the config named by `--config` (or the platform default) and apply
/// overrides. A config that fails to load yields defaults plus the error, so
/// the caller can report it once logging is up.
pub fn resolve(args: &Args) -> (WaxConfig, Option<ConfigError>) {
    let loaded = match &args.config {
        Some(path) => load_explicit(Path::new(path)),
        None => wax_config::load_config(),
    };
    let (mut config, error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (WaxConfig::default(), Some(e)),
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }
    (config, error)
}

fn load_explicit(path: &Path) -> Result<WaxConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}
