//! The four standard wallet actions.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use serde_json::{json, Value};
use tracing::debug;

use super::wallet::{Authorization, ChainAction, TransactOptions, WalletSdk};
use super::{Action, ActionError};
use crate::payload::{
    AuthenticationData, BalanceInfo, RefreshBalanceData, TransferNftData, TransferTokenData,
};
use crate::route::{split_list, AUTHENTICATE, REFRESH_BALANCE, TRANSFER_NFT, TRANSFER_TOKEN};
use crate::DEFAULT_TOKEN_CONTRACT;

const NFT_CONTRACT: &str = "atomicassets";

type Params = BTreeMap<String, String>;

fn present<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

fn require(params: &Params, keys: &[&str], message: &'static str) -> Result<(), ActionError> {
    if keys.iter().all(|k| present(params, k).is_some()) {
        Ok(())
    } else {
        Err(ActionError::MissingParams(message))
    }
}

fn to_value<T: serde::Serialize>(data: &T) -> Result<Value, ActionError> {
    serde_json::to_value(data).map_err(|e| ActionError::Failed(e.to_string()))
}

/// Balance of one contract; lookup failures yield a `None` balance.
pub async fn balance_by_contract(wallet: &dyn WalletSdk, contract: &str, account: &str) -> BalanceInfo {
    match wallet.currency_balance(contract, account).await {
        Ok(entries) => match entries.first() {
            Some(raw) => BalanceInfo::from_rpc(contract, raw),
            None => BalanceInfo::unavailable(contract),
        },
        Err(e) => {
            debug!(contract, error = %e, "balance lookup failed");
            BalanceInfo::unavailable(contract)
        }
    }
}

/// Balances for several contracts, fetched concurrently. Contracts whose
/// lookup failed are left out.
pub async fn user_balances(wallet: &dyn WalletSdk, contracts: &[String], account: &str) -> Vec<BalanceInfo> {
    let lookups = contracts
        .iter()
        .map(|contract| balance_by_contract(wallet, contract, account));
    join_all(lookups)
        .await
        .into_iter()
        .filter(|info| info.balance.is_some())
        .collect()
}

/// `amount` with eight decimals followed by the symbol.
pub fn format_quantity(amount: &str, symbol: &str) -> Result<String, ActionError> {
    let value: f64 = amount
        .trim()
        .parse()
        .map_err(|_| ActionError::Failed(format!("amount {amount:?} is not a number")))?;
    Ok(format!("{value:.8} {symbol}"))
}

async fn ensure_session(wallet: &dyn WalletSdk) -> Result<String, ActionError> {
    if !wallet.has_api() {
        wallet.login().await?;
    }
    Ok(wallet.user_account().unwrap_or_default())
}

pub struct AuthenticateAction {
    wallet: Arc<dyn WalletSdk>,
}

impl AuthenticateAction {
    pub fn new(wallet: Arc<dyn WalletSdk>) -> Self {
        Self { wallet }
    }
}

#[async_trait]
impl Action for AuthenticateAction {
    fn name(&self) -> &str {
        AUTHENTICATE
    }

    async fn handle(&self, params: &Params) -> Result<Value, ActionError> {
        require(params, &["tokenContracts"], "TokenContracts are required")?;
        let contracts = split_list(present(params, "tokenContracts").unwrap_or_default());

        let user_account = self.wallet.login().await?;
        let balance = user_balances(self.wallet.as_ref(), &contracts, &user_account).await;
        let user = self.wallet.user().unwrap_or_default();

        to_value(&AuthenticationData {
            user_account,
            avatar_url: user.avatar_url,
            is_temp: user.is_temp,
            keys: user.keys,
            trust_score: user.trust_score.unwrap_or(0.0),
            trust_score_provider: user.trust_score_provider,
            balance,
        })
    }
}

pub struct RefreshBalanceAction {
    wallet: Arc<dyn WalletSdk>,
}

impl RefreshBalanceAction {
    pub fn new(wallet: Arc<dyn WalletSdk>) -> Self {
        Self { wallet }
    }
}

#[async_trait]
impl Action for RefreshBalanceAction {
    fn name(&self) -> &str {
        REFRESH_BALANCE
    }

    async fn handle(&self, params: &Params) -> Result<Value, ActionError> {
        require(
            params,
            &["userAccount", "tokenContract"],
            "UserAccount and TokenContract are required",
        )?;
        let contract = present(params, "tokenContract").unwrap_or_default();
        let account = present(params, "userAccount").unwrap_or_default();

        let balance = balance_by_contract(self.wallet.as_ref(), contract, account).await;
        to_value(&RefreshBalanceData { balance })
    }
}

pub struct TransferTokenAction {
    wallet: Arc<dyn WalletSdk>,
}

impl TransferTokenAction {
    pub fn new(wallet: Arc<dyn WalletSdk>) -> Self {
        Self { wallet }
    }
}

#[async_trait]
impl Action for TransferTokenAction {
    fn name(&self) -> &str {
        TRANSFER_TOKEN
    }

    async fn handle(&self, params: &Params) -> Result<Value, ActionError> {
        require(
            params,
            &["toAccount", "amount", "symbol"],
            "To Account, amount and symbol are required",
        )?;
        let contract = present(params, "tokenContract").unwrap_or(DEFAULT_TOKEN_CONTRACT);
        let quantity = format_quantity(
            present(params, "amount").unwrap_or_default(),
            present(params, "symbol").unwrap_or_default(),
        )?;

        let actor = ensure_session(self.wallet.as_ref()).await?;
        let action = ChainAction {
            account: contract.to_string(),
            name: "transfer".into(),
            authorization: vec![Authorization::active(&actor)],
            data: json!({
                "from": actor,
                "to": present(params, "toAccount"),
                "quantity": quantity,
                "memo": params.get("memoContent").cloned().unwrap_or_default(),
            }),
        };
        let result = self
            .wallet
            .transact(vec![action], TransactOptions::default())
            .await?;

        to_value(&TransferTokenData {
            token_contract: Some(contract.to_string()),
            transaction_id: result.transaction_id,
        })
    }
}

pub struct TransferNftAction {
    wallet: Arc<dyn WalletSdk>,
}

impl TransferNftAction {
    pub fn new(wallet: Arc<dyn WalletSdk>) -> Self {
        Self { wallet }
    }
}

#[async_trait]
impl Action for TransferNftAction {
    fn name(&self) -> &str {
        TRANSFER_NFT
    }

    async fn handle(&self, params: &Params) -> Result<Value, ActionError> {
        require(
            params,
            &["toAccount", "assetIds"],
            "To Account and Asset Ids are required",
        )?;
        let asset_ids = split_list(present(params, "assetIds").unwrap_or_default());

        let actor = ensure_session(self.wallet.as_ref()).await?;
        let action = ChainAction {
            account: NFT_CONTRACT.into(),
            name: "transfer".into(),
            authorization: vec![Authorization::active(&actor)],
            data: json!({
                "from": actor,
                "to": present(params, "toAccount"),
                "asset_ids": asset_ids,
                "memo": params.get("memoContent").cloned().unwrap_or_default(),
            }),
        };
        let result = self
            .wallet
            .transact(vec![action], TransactOptions::default())
            .await?;

        to_value(&TransferNftData {
            transaction_id: result.transaction_id,
        })
    }
}
