//! Native side of the wallet bridge.
//!
//! A request is encoded as a [`Route`] in the URL fragment of the page
//! served by the loopback server; the page answers by navigating to a
//! `coconutwax://result` callback URL which [`codec`] decodes. The
//! [`WalletBridge`] ties one request to its single callback.

pub mod codec;
pub mod correlator;
pub mod dispatcher;
pub mod payload;
pub mod pending;
pub mod route;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;

pub use codec::{decode_callback, decode_envelope, encode_callback, CallbackEnvelope, CallbackPayload};
pub use correlator::{BridgeState, TokenTransfer, WalletBridge};
pub use dispatcher::{Action, ActionDispatcher, ActionError, Navigator, WalletError, WalletSdk};
pub use payload::{
    AuthenticationData, BalanceInfo, RefreshBalanceData, TransferNftData, TransferTokenData,
};
pub use pending::{pending, Completer, PendingOperation};
pub use route::{parse_query, Route};
pub use surface::{DisplaySurface, SurfaceEvent, SurfaceFactory, SurfaceOptions};

/// Token contract used when the caller names none.
pub const DEFAULT_TOKEN_CONTRACT: &str = "eosio.token";
