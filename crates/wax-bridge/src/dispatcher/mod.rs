//! Page-side action dispatch.
//!
//! Mirrors what the bundled `app.js` does inside the display surface: read
//! the route from the URL fragment once, run the matching action against
//! the wallet SDK and always answer with exactly one callback navigation.
//! Used to host the protocol headlessly and to exercise the bridge
//! end to end.

mod actions;
mod wallet;


pub use actions::{
    balance_by_contract, format_quantity, user_balances, AuthenticateAction, RefreshBalanceAction,
    TransferNftAction, TransferTokenAction,
};
pub use wallet::{
    Authorization, ChainAction, TransactOptions, TransactResult, WalletError, WalletSdk, WaxUser,
};

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};
use wax_common::Result;

use crate::codec::{encode_callback, CallbackPayload, UNKNOWN_ROUTE_ACTION};
use crate::route::Route;

/// Delay before navigating to a callback, giving the page time to settle.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(200);

pub const UNKNOWN_ROUTE_MESSAGE: &str = "Unknown hash detected";

/// Why an action produced no data. Displays as the message sent to the host.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("{0}")]
    MissingParams(&'static str),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("{0}")]
    Failed(String),
}

#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &str;

    async fn handle(&self, params: &BTreeMap<String, String>) -> std::result::Result<Value, ActionError>;
}

/// Where callbacks go: the surface's location bar, in practice.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);

    fn close(&self);
}

pub struct ActionDispatcher {
    actions: HashMap<String, Arc<dyn Action>>,
    settle_delay: Duration,
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Dispatcher with the four standard actions bound to `wallet`.
    pub fn with_wallet(wallet: Arc<dyn WalletSdk>) -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register(Arc::new(AuthenticateAction::new(Arc::clone(&wallet))));
        dispatcher.register(Arc::new(RefreshBalanceAction::new(Arc::clone(&wallet))));
        dispatcher.register(Arc::new(TransferTokenAction::new(Arc::clone(&wallet))));
        dispatcher.register(Arc::new(TransferNftAction::new(wallet)));
        dispatcher
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn register(&mut self, action: Arc<dyn Action>) {
        self.actions.insert(action.name().to_string(), action);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Handle a freshly loaded page at `location` (full URL).
    pub async fn on_page_load(&self, location: &str, navigator: &dyn Navigator) -> Result<bool> {
        let fragment = location.split_once('#').map(|(_, f)| f).unwrap_or_default();
        match Route::parse(fragment) {
            Some(route) => self.process(&route, navigator).await,
            None => self.reject_unknown("", navigator).await,
        }
    }

    /// Run the action for `route` and navigate to its callback.
    ///
    /// Returns `false` if the route was unknown; the callback then carries
    /// action `error` and the surface is asked to close.
    pub async fn process(&self, route: &Route, navigator: &dyn Navigator) -> Result<bool> {
        let Some(action) = self.actions.get(route.name()) else {
            return self.reject_unknown(route.name(), navigator).await;
        };

        debug!(action = route.name(), "processing action");
        let payload = match action.handle(route.params()).await {
            Ok(data) => CallbackPayload::success(data),
            Err(e) => {
                info!(action = route.name(), error = %e, "action failed");
                CallbackPayload::failure(e.to_string())
            }
        };
        self.send(action.name(), &payload, navigator).await?;
        Ok(true)
    }

    async fn reject_unknown(&self, name: &str, navigator: &dyn Navigator) -> Result<bool> {
        warn!(route = name, "unknown route");
        let payload = CallbackPayload::failure(UNKNOWN_ROUTE_MESSAGE);
        self.send(UNKNOWN_ROUTE_ACTION, &payload, navigator).await?;
        navigator.close();
        Ok(false)
    }

    async fn send(&self, action: &str, payload: &CallbackPayload, navigator: &dyn Navigator) -> Result<()> {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
        let url = match encode_callback(action, payload) {
            Ok(url) => url,
            Err(e) => {
                warn!(action, error = %e, "result could not be encoded");
                let fallback = CallbackPayload::failure(format!("unserializable result: {e}"));
                encode_callback(action, &fallback)?
            }
        };
        navigator.navigate(&url);
        Ok(())
    }
}
