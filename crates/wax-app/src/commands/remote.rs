//! AtomicAssets queries.

use tokio_util::sync::CancellationToken;
use wax_atomic::{AssetQuery, AtomicAssetsClient, UserAssetsResponse};
use wax_common::Result;
use wax_config::WaxConfig;

use super::print_json;
use crate::cli::AssetsArgs;

pub fn query_for(args: &AssetsArgs) -> AssetQuery {
    let mut query = AssetQuery::owner(&args.owner).page(args.page).limit(args.limit);
    if let Some(transferable) = args.transferable {
        query = query.transferable(transferable);
    }
    if let Some(collection) = &args.collection {
        query = query.collection(collection);
    }
    query
}

pub fn assets(args: &AssetsArgs, config: &WaxConfig) -> Result<()> {
    let client = AtomicAssetsClient::new(&config.remote)?;
    let query = query_for(args);
    super::runtime()?.block_on(async {
        let cancel = cancel_on_ctrl_c();
        let response: UserAssetsResponse = client.user_assets(&query, &cancel).await?;
        print_json(&response)
    })
}

pub fn image(hash: &str, out: &str, config: &WaxConfig) -> Result<()> {
    let client = AtomicAssetsClient::new(&config.remote)?;
    let bytes = super::runtime()?.block_on(async {
        let cancel = cancel_on_ctrl_c();
        client.asset_image(hash, &cancel).await
    })?;
    std::fs::write(out, &bytes)?;
    tracing::info!(path = out, bytes = bytes.len(), "image saved");
    Ok(())
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });
    cancel
}
