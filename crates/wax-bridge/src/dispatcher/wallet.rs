//! Wallet SDK seam used by the page-side actions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Failure reported by the wallet SDK. Displays as the bare message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct WalletError(pub String);

/// Profile of the logged-in user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaxUser {
    pub avatar_url: Option<String>,
    pub is_temp: bool,
    pub keys: Vec<String>,
    pub trust_score: Option<f64>,
    pub trust_score_provider: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    pub actor: String,
    pub permission: String,
}

impl Authorization {
    pub fn active(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            permission: "active".into(),
        }
    }
}

/// One action of a chain transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainAction {
    pub account: String,
    pub name: String,
    pub authorization: Vec<Authorization>,
    pub data: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactOptions {
    pub blocks_behind: u32,
    pub expire_seconds: u32,
}

impl Default for TransactOptions {
    fn default() -> Self {
        Self {
            blocks_behind: 3,
            expire_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransactResult {
    pub transaction_id: Option<String>,
}

/// Wallet operations the bundled page relies on.
#[async_trait]
pub trait WalletSdk: Send + Sync {
    /// Log in (prompting if needed) and return the account name.
    async fn login(&self) -> Result<String, WalletError>;

    fn user(&self) -> Option<WaxUser>;

    fn user_account(&self) -> Option<String>;

    /// Whether a signing session already exists.
    fn has_api(&self) -> bool;

    async fn transact(
        &self,
        actions: Vec<ChainAction>,
        options: TransactOptions,
    ) -> Result<TransactResult, WalletError>;

    /// Balance strings such as `"1.00000000 WAX"`.
    async fn currency_balance(&self, contract: &str, account: &str)
        -> Result<Vec<String>, WalletError>;
}
