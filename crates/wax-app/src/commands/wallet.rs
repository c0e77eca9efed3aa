//! Wallet operations: bridge on a worker thread, webview on the main thread.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use serde_json::Value;
use tracing::info;
use wax_bridge::{TokenTransfer, WalletBridge};
use wax_common::{MainLoop, MainLoopHandle, Result, WaxError};
use wax_config::WaxConfig;
use wax_server::resolver_for;
use wax_webview::{surface_channel, WryDisplayFactory};
use winit::event_loop::EventLoop;

use super::window::WalletWindow;
use crate::cli::Command;

#[derive(Debug, Clone, PartialEq)]
pub enum WalletOp {
    Authenticate { contracts: Vec<String> },
    RefreshBalance { contract: String, account: String },
    TransferToken(TokenTransfer),
    TransferNft { to: String, assets: Vec<String>, memo: String },
}

impl WalletOp {
    pub fn from_command(command: Command) -> Option<Self> {
        Some(match command {
            Command::Authenticate { contracts } => WalletOp::Authenticate { contracts },
            Command::RefreshBalance { contract, account } => {
                WalletOp::RefreshBalance { contract, account }
            }
            Command::TransferToken(t) => WalletOp::TransferToken(
                TokenTransfer::new(t.to, t.amount, t.symbol)
                    .contract(t.contract)
                    .memo(t.memo),
            ),
            Command::TransferNft { to, assets, memo } => WalletOp::TransferNft { to, assets, memo },
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            WalletOp::Authenticate { .. } => "authenticate",
            WalletOp::RefreshBalance { .. } => "refresh-balance",
            WalletOp::TransferToken(_) => "transfer-token",
            WalletOp::TransferNft { .. } => "transfer-nft",
        }
    }
}

/// Run `op` against `bridge` and return its data as JSON.
pub async fn perform(bridge: &mut WalletBridge, op: WalletOp) -> Result<Value> {
    let value = match op {
        WalletOp::Authenticate { contracts } => to_value(bridge.authenticate(&contracts).await?),
        WalletOp::RefreshBalance { contract, account } => {
            to_value(bridge.refresh_balance(&contract, &account).await?)
        }
        WalletOp::TransferToken(transfer) => to_value(bridge.transfer_token(&transfer).await?),
        WalletOp::TransferNft { to, assets, memo } => {
            to_value(bridge.transfer_nft(&to, &assets, &memo).await?)
        }
    };
    value.map_err(|e| WaxError::Protocol(format!("failed to serialize result: {e}")))
}

fn to_value<T: serde::Serialize>(data: T) -> serde_json::Result<Value> {
    serde_json::to_value(data)
}

pub fn run(op: WalletOp, config: WaxConfig) -> Result<()> {
    let (main_loop, handle) = MainLoop::new();
    let (factory, host) = surface_channel(config.display.width, config.display.height);
    let (done_tx, done_rx) = mpsc::channel();

    let title = format!("CoconutWax - {}", op.name());
    let size = (config.display.width, config.display.height);
    let worker = thread::Builder::new()
        .name("wax-bridge".into())
        .spawn(move || {
            let result = run_bridge(config, handle, factory, op);
            let _ = done_tx.send(result);
        })?;

    let event_loop = EventLoop::new()
        .map_err(|e| WaxError::SurfaceUnavailable(format!("failed to create event loop: {e}")))?;
    let mut window = WalletWindow::new(title, size, host, main_loop, done_rx);
    info!("entering event loop");
    event_loop
        .run_app(&mut window)
        .map_err(|e| WaxError::SurfaceUnavailable(format!("event loop error: {e}")))?;

    let outcome = window.take_result();
    // The main loop is gone now, so a worker still waiting on it fails fast.
    drop(window);
    let _ = worker.join();

    let value = outcome.unwrap_or_else(|| {
        Err(WaxError::Unhandled("window closed before the operation finished".into()))
    })?;
    super::print_json(&value)
}

fn run_bridge(
    config: WaxConfig,
    main_loop: MainLoopHandle,
    factory: WryDisplayFactory,
    op: WalletOp,
) -> Result<Value> {
    let runtime = super::runtime()?;
    runtime.block_on(async move {
        let resolver = resolver_for(&config.content, std::env::current_dir()?, &main_loop)?;
        let mut bridge = WalletBridge::from_config(&config, resolver).with_surfaces(Arc::new(factory));
        perform(&mut bridge, op).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::TransferTokenArgs;

    #[test]
    fn transfer_token_command_maps_to_transfer() {
        let op = WalletOp::from_command(Command::TransferToken(TransferTokenArgs {
            to: "bob.wam".into(),
            amount: 2.5,
            contract: "alien.worlds".into(),
            symbol: "TLM".into(),
            memo: "gg".into(),
        }))
        .unwrap();
        assert_eq!(
            op,
            WalletOp::TransferToken(
                TokenTransfer::new("bob.wam", 2.5, "TLM").contract("alien.worlds").memo("gg")
            )
        );
        assert_eq!(op.name(), "transfer-token");
    }

    #[test]
    fn non_wallet_commands_are_not_ops() {
        assert!(WalletOp::from_command(Command::Serve).is_none());
        assert!(WalletOp::from_command(Command::Decode { url: "x".into() }).is_none());
    }
}
