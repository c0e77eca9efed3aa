//! HTTP client for the AtomicAssets listing API and the IPFS image gateway.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use wax_common::{Result, WaxError};
use wax_config::RemoteConfig;

use crate::types::{AssetQuery, UserAssetsResponse};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Two clients: API calls carry JSON default headers, image downloads carry
/// none. Headers live on the client, never in process-wide state.
pub struct AtomicAssetsClient {
    base_url: String,
    image_base_url: String,
    api: reqwest::Client,
    images: reqwest::Client,
}

impl AtomicAssetsClient {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let api = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| WaxError::Transport(format!("failed to build HTTP client: {e}")))?;
        let images = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| WaxError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: with_trailing_slash(&config.atomic_assets_url),
            image_base_url: with_trailing_slash(&config.image_base_url),
            api,
            images,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn assets_url(&self, query: &AssetQuery) -> String {
        format!("{}{}", self.base_url, query.path())
    }

    pub fn image_url(&self, hash: &str) -> String {
        format!("{}{}", self.image_base_url, hash.trim_start_matches('/'))
    }

    /// Assets owned by `query.owner`, with `data` decoded as `T`.
    pub async fn user_assets<T: DeserializeOwned>(
        &self,
        query: &AssetQuery,
        cancel: &CancellationToken,
    ) -> Result<UserAssetsResponse<T>> {
        let url = self.assets_url(query);
        debug!(%url, "fetching assets");
        let body = cancellable(cancel, fetch(&self.api, &url)).await?;
        serde_json::from_slice(&body)
            .map_err(|e| WaxError::Protocol(format!("unexpected assets response: {e}")))
    }

    /// Raw image bytes for an IPFS content hash.
    pub async fn asset_image(&self, hash: &str, cancel: &CancellationToken) -> Result<Vec<u8>> {
        let url = self.image_url(hash);
        debug!(%url, "fetching image");
        cancellable(cancel, fetch(&self.images, &url)).await
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

async fn cancellable<T>(cancel: &CancellationToken, work: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::select! {
        _ = cancel.cancelled() => Err(WaxError::Cancelled),
        result = work => result,
    }
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| WaxError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let text = text.chars().take(200).collect::<String>();
        return Err(WaxError::Transport(format!("HTTP {status}: {text}")));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| WaxError::Transport(e.to_string()))?;
    Ok(bytes.to_vec())
}
