//! Subscriber setup.

use tracing_subscriber::EnvFilter;
use wax_config::LogLevel;

const FALLBACK_DIRECTIVE: &str = "wax=info,coconut_wax=info";

/// Expand a bare level to a directive for the workspace crates. Anything
/// with `=` or `,` is taken as a full directive.
pub fn directive_for(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("wax={level},coconut_wax={level}")
    }
}

/// `--log-level` wins, then `RUST_LOG`, then `[logging].level`.
pub fn build_filter(cli_level: Option<&str>, config_level: LogLevel) -> EnvFilter {
    let filter = match cli_level {
        Some(level) => EnvFilter::try_new(directive_for(level)),
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(directive_for(config_level.as_str()))),
    };
    filter.unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE))
}

pub fn init(cli_level: Option<&str>, config_level: LogLevel) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(cli_level, config_level))
        .with_writer(std::io::stderr)
        .init();
}
