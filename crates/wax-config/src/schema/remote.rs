//! Remote service endpoints.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RemoteConfig {
    /// AtomicAssets API base, with trailing slash.
    pub atomic_assets_url: String,
    /// Gateway prefix for asset images addressed by content hash.
    pub image_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            atomic_assets_url: "https://wax.api.atomicassets.io/".into(),
            image_base_url: "https://ipfs.io/ipfs/".into(),
            request_timeout_secs: 30,
        }
    }
}

impl RemoteConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
