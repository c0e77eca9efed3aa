//! Full configuration validation.
//!
//! Each section has its own check; errors are collected and reported
//! together as one `ConfigError`.

mod helpers;


use std::net::IpAddr;

use crate::schema::{ContentSource, WaxConfig};
use helpers::{validate_range, validate_url};
use wax_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WaxConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_server(&mut errors, config);
    validate_content(&mut errors, config);
    validate_display(&mut errors, config);
    validate_remote(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_server(errors: &mut Vec<String>, config: &WaxConfig) {
    match config.server.host.parse::<IpAddr>() {
        Ok(ip) if ip.is_loopback() => {}
        Ok(_) => errors.push(format!(
            "server.host = {} is not a loopback address",
            config.server.host
        )),
        Err(_) => errors.push(format!(
            "server.host = {:?} is not an IP address",
            config.server.host
        )),
    }
    if config.server.port == 0 {
        errors.push("server.port must not be 0".into());
    }
    if config.server.content_dir.trim().is_empty() {
        errors.push("server.content_dir must not be empty".into());
    }
}

fn validate_content(errors: &mut Vec<String>, config: &WaxConfig) {
    let needs_base = config.content.source.resolve() == ContentSource::Network;
    match &config.content.base_url {
        Some(url) => validate_url(errors, "content.base_url", url),
        None if needs_base => {
            errors.push("content.base_url is required for the network source".into())
        }
        None => {}
    }
}

fn validate_display(errors: &mut Vec<String>, config: &WaxConfig) {
    validate_range(errors, "display.width", config.display.width as u64, 200, 8192);
    validate_range(errors, "display.height", config.display.height as u64, 200, 8192);
    validate_range(
        errors,
        "display.callback_timeout_secs",
        config.display.callback_timeout_secs,
        0,
        3600,
    );
    for ua in &config.display.user_agents {
        if ua.platform.trim().is_empty() {
            errors.push("display.user_agents entry has an empty platform".into());
        }
    }
}

fn validate_remote(errors: &mut Vec<String>, config: &WaxConfig) {
    validate_url(errors, "remote.atomic_assets_url", &config.remote.atomic_assets_url);
    validate_url(errors, "remote.image_base_url", &config.remote.image_base_url);
    validate_range(
        errors,
        "remote.request_timeout_secs",
        config.remote.request_timeout_secs,
        1,
        600,
    );
}
