//! Ties one outbound wallet request to its single inbound callback.
//!
//! Every operation runs a fresh loopback server, opens a display surface on
//! the bootstrap page with the request encoded in the fragment, and waits
//! for the surface to report back. Whatever happens, the server is stopped
//! before the operation returns.

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tracing::{debug, info, info_span, warn, Instrument};
use wax_common::{OperationId, Result, WaxError};
use wax_config::{ServerConfig, WaxConfig};
use wax_server::{ContentResolver, LocalServer};

use crate::codec::{decode_envelope, CallbackEnvelope};
use crate::payload::{AuthenticationData, RefreshBalanceData, TransferNftData, TransferTokenData};
use crate::pending::{pending, Completer};
use crate::route::{Route, AUTHENTICATE, REFRESH_BALANCE, TRANSFER_NFT, TRANSFER_TOKEN};
use crate::surface::{DisplaySurface, SurfaceEvent, SurfaceFactory, SurfaceOptions};
use crate::DEFAULT_TOKEN_CONTRACT;

/// Where the current operation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Idle,
    ServerStarting,
    AwaitingDisplay,
    AwaitingCallback,
    Resolved,
    Failed,
    Cancelled,
}

impl fmt::Display for BridgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BridgeState::Idle => "idle",
            BridgeState::ServerStarting => "server-starting",
            BridgeState::AwaitingDisplay => "awaiting-display",
            BridgeState::AwaitingCallback => "awaiting-callback",
            BridgeState::Resolved => "resolved",
            BridgeState::Failed => "failed",
            BridgeState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Parameters of a fungible token transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenTransfer {
    pub to_account: String,
    pub amount: f64,
    pub token_contract: String,
    pub symbol: String,
    pub memo: String,
}

impl TokenTransfer {
    pub fn new(to_account: impl Into<String>, amount: f64, symbol: impl Into<String>) -> Self {
        Self {
            to_account: to_account.into(),
            amount,
            token_contract: DEFAULT_TOKEN_CONTRACT.into(),
            symbol: symbol.into(),
            memo: String::new(),
        }
    }

    pub fn contract(mut self, contract: impl Into<String>) -> Self {
        self.token_contract = contract.into();
        self
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }
}

/// Native entry point for wallet operations.
///
/// Operations take `&mut self`, so one instance runs at most one request
/// at a time.
pub struct WalletBridge {
    server_config: ServerConfig,
    resolver: Arc<dyn ContentResolver>,
    surfaces: Option<Arc<dyn SurfaceFactory>>,
    user_agent: Option<String>,
    callback_timeout: Option<Duration>,
    state: BridgeState,
}

impl WalletBridge {
    pub fn new(server_config: ServerConfig, resolver: Arc<dyn ContentResolver>) -> Self {
        Self {
            server_config,
            resolver,
            surfaces: None,
            user_agent: None,
            callback_timeout: None,
            state: BridgeState::Idle,
        }
    }

    /// Bridge configured from the `[server]` and `[display]` sections.
    pub fn from_config(config: &WaxConfig, resolver: Arc<dyn ContentResolver>) -> Self {
        let mut bridge = Self::new(config.server.clone(), resolver);
        bridge.user_agent = config.display.current_user_agent().map(String::from);
        bridge.callback_timeout = config.display.callback_timeout();
        bridge
    }

    pub fn with_surfaces(mut self, surfaces: Arc<dyn SurfaceFactory>) -> Self {
        self.surfaces = Some(surfaces);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_callback_timeout(mut self, timeout: Duration) -> Self {
        self.callback_timeout = Some(timeout);
        self
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Log in and fetch balances for `token_contracts` (`eosio.token` if empty).
    pub async fn authenticate(&mut self, token_contracts: &[String]) -> Result<AuthenticationData> {
        let route = if token_contracts.is_empty() {
            Route::new(AUTHENTICATE).list_param("tokenContracts", &[DEFAULT_TOKEN_CONTRACT])
        } else {
            Route::new(AUTHENTICATE).list_param("tokenContracts", token_contracts)
        };
        self.run(route, false).await
    }

    pub async fn transfer_token(&mut self, transfer: &TokenTransfer) -> Result<TransferTokenData> {
        let route = Route::new(TRANSFER_TOKEN)
            .param("toAccount", transfer.to_account.as_str())
            .param("amount", transfer.amount.to_string())
            .param("tokenContract", transfer.token_contract.as_str())
            .param("symbol", transfer.symbol.as_str())
            .param("memoContent", transfer.memo.as_str());
        self.run(route, false).await
    }

    pub async fn transfer_nft(
        &mut self,
        to_account: &str,
        asset_ids: &[String],
        memo: &str,
    ) -> Result<TransferNftData> {
        let route = Route::new(TRANSFER_NFT)
            .param("toAccount", to_account)
            .list_param("assetIds", asset_ids)
            .param("memoContent", memo);
        self.run(route, false).await
    }

    /// Balance lookup. Runs silently: the surface is never shown.
    pub async fn refresh_balance(
        &mut self,
        token_contract: &str,
        user_account: &str,
    ) -> Result<RefreshBalanceData> {
        let route = Route::new(REFRESH_BALANCE)
            .param("tokenContract", token_contract)
            .param("userAccount", user_account);
        self.run(route, true).await
    }

    async fn run<T>(&mut self, route: Route, silent: bool) -> Result<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let id = OperationId::new();
        let span = info_span!("operation", id = %id, action = route.name());
        async {
            let result = self.execute::<T>(&route, silent).await;
            let terminal = match &result {
                Ok(_) => BridgeState::Resolved,
                Err(WaxError::Unhandled(_) | WaxError::Cancelled | WaxError::Timeout(_)) => {
                    BridgeState::Cancelled
                }
                Err(_) => BridgeState::Failed,
            };
            self.transition(terminal);
            match &result {
                Ok(_) => info!("operation resolved"),
                Err(e) => warn!(error = %e, "operation did not resolve"),
            }
            self.transition(BridgeState::Idle);
            result
        }
        .instrument(span)
        .await
    }

    async fn execute<T>(&mut self, route: &Route, silent: bool) -> Result<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.transition(BridgeState::ServerStarting);
        // Dropped on every exit path, which stops the server.
        let mut server = LocalServer::new(self.server_config.clone(), Arc::clone(&self.resolver));
        server.start()?;
        if !server.is_running() {
            return Err(WaxError::Server("Local server is not running".into()));
        }

        self.transition(BridgeState::AwaitingDisplay);
        let surfaces = self.surfaces.clone().ok_or_else(|| {
            WaxError::SurfaceUnavailable("no display surface configured".into())
        })?;
        let (events_tx, mut events) = mpsc::unbounded_channel();
        let options = SurfaceOptions {
            user_agent: self.user_agent.clone(),
            silent,
        };
        let mut surface = surfaces.open(&options, events_tx)?;

        let url = format!("{}{}", server.url(), route.to_fragment());
        if let Err(e) = load_surface(surface.as_mut(), &url, silent) {
            surface.close();
            return Err(e);
        }
        info!(%url, silent, "surface loaded");

        self.transition(BridgeState::AwaitingCallback);
        let (completer, result) = pending::<T>();
        let listen = listen_for_callback(route.name(), &mut events, completer.clone());
        match self.callback_timeout {
            Some(limit) => {
                if tokio::time::timeout(limit, listen).await.is_err() {
                    completer.complete(Err(WaxError::Timeout(limit)));
                }
            }
            None => listen.await,
        }
        surface.close();
        drop(completer);

        let outcome = result.await;
        // Joining the server thread blocks, so it runs off the async workers.
        if let Err(e) = tokio::task::spawn_blocking(move || server.stop()).await {
            warn!(error = %e, "local server shutdown task failed");
        }
        outcome
    }

    fn transition(&mut self, next: BridgeState) {
        debug!(from = %self.state, to = %next, "bridge state");
        self.state = next;
    }
}

fn load_surface(surface: &mut dyn DisplaySurface, url: &str, silent: bool) -> Result<()> {
    surface.load(url)?;
    if !silent {
        surface.show()?;
    }
    Ok(())
}

/// Consume surface events until the operation is resolved.
async fn listen_for_callback<T: DeserializeOwned>(
    expected: &str,
    events: &mut mpsc::UnboundedReceiver<SurfaceEvent>,
    completer: Completer<T>,
) {
    while let Some(event) = events.recv().await {
        match event {
            SurfaceEvent::PageLoaded { url } => debug!(%url, "page loaded"),
            SurfaceEvent::Message(raw) => {
                debug!("callback received");
                completer.complete(decode_for(expected, &raw));
                return;
            }
            SurfaceEvent::LoadError { code, message } => {
                warn!(code, %message, "surface failed to load");
                completer.complete(Err(WaxError::Load { code, message }));
                return;
            }
            SurfaceEvent::CloseRequested => {
                completer.complete(Err(WaxError::Unhandled(
                    "display surface closed without result".into(),
                )));
                return;
            }
        }
    }
    completer.complete(Err(WaxError::Unhandled(
        "display surface went away without result".into(),
    )));
}

/// Decode a callback for the route named `expected`.
///
/// An explicit error from the page wins over an action mismatch, so an
/// unknown-route reply surfaces its message.
fn decode_for<T: DeserializeOwned>(expected: &str, raw: &str) -> Result<T> {
    let CallbackEnvelope { action, payload } = decode_envelope(raw)?;
    if let Some(message) = payload.error_message() {
        return Err(WaxError::Rejected(message.to_string()));
    }
    if action != expected {
        return Err(WaxError::Protocol(format!(
            "expected a '{expected}' callback, got '{action}'"
        )));
    }
    payload.into_data()
}
