mod cli;
mod commands;
mod logging;
mod settings;

use std::process::ExitCode;

fn main() -> ExitCode {
    let args = cli::parse();
    let (config, config_error) = settings::resolve(&args);

    logging::init(args.log_level.as_deref(), config.logging.level);
    tracing::info!("CoconutWax v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {path}");
    }
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }
    tracing::debug!(url = %config.server.url(), source = ?config.content.source, "config resolved");

    match commands::run(args.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
