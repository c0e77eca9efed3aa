//! Subcommand implementations.

mod decode;
mod remote;
mod serve;
mod wallet;
mod window;

use serde::Serialize;
use wax_common::{Result, WaxError};
use wax_config::WaxConfig;

use crate::cli::Command;

pub fn run(command: Command, config: WaxConfig) -> Result<()> {
    match command {
        Command::Serve => serve::run(&config),
        Command::Assets(args) => remote::assets(&args, &config),
        Command::Image { hash, out } => remote::image(&hash, &out, &config),
        Command::Decode { url } => decode::run(&url),
        Command::Config => {
            println!("{}", wax_config::config_to_json(&config));
            Ok(())
        }
        wallet_command => match wallet::WalletOp::from_command(wallet_command) {
            Some(op) => wallet::run(op, config),
            None => Err(WaxError::Server("unsupported command".into())),
        },
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| WaxError::Protocol(format!("failed to serialize output: {e}")))?;
    println!("{text}");
    Ok(())
}

/// Multi-thread runtime for one-shot commands.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}
