//! Typed results carried in callback payloads.

use serde::{Deserialize, Serialize};

/// Balance of one token contract. `balance` is `None` when the lookup failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct BalanceInfo {
    pub contract: String,
    pub balance: Option<f64>,
    pub symbol: Option<String>,
}

impl BalanceInfo {
    /// Parse an RPC balance string such as `"12.50000000 WAX"`.
    pub fn from_rpc(contract: impl Into<String>, raw: &str) -> Self {
        let mut parts = raw.split_whitespace();
        let balance = parts.next().and_then(|amount| amount.parse::<f64>().ok());
        let symbol = parts.next().map(String::from);
        Self {
            contract: contract.into(),
            balance,
            symbol,
        }
    }

    pub fn unavailable(contract: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            balance: None,
            symbol: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthenticationData {
    pub user_account: String,
    pub avatar_url: Option<String>,
    pub is_temp: bool,
    pub keys: Vec<String>,
    pub trust_score: f64,
    pub trust_score_provider: Option<String>,
    pub balance: Vec<BalanceInfo>,
}

impl AuthenticationData {
    /// Replace the balance of `info.contract`, or append it if unknown.
    pub fn update_balance(&mut self, info: BalanceInfo) {
        match self.balance.iter_mut().find(|b| b.contract == info.contract) {
            Some(existing) => {
                existing.balance = info.balance;
                if info.symbol.is_some() {
                    existing.symbol = info.symbol;
                }
            }
            None => self.balance.push(info),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshBalanceData {
    pub balance: BalanceInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TransferTokenData {
    pub token_contract: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TransferNftData {
    pub transaction_id: Option<String>,
}
