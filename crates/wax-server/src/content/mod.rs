//! Read access to the bundled wallet content.
//!
//! Desktop builds read straight from disk. Packaged targets (Android, wasm)
//! only expose their bundle through a URL, so those reads go through an
//! HTTP fetch issued from the main loop.

mod fs;
mod network;

pub use fs::FileSystemResolver;
pub use network::NetworkResolver;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use wax_common::{ConfigError, MainLoopHandle, Result, WaxError};
use wax_config::{ContentConfig, ContentSource};

/// Storage backend the server reads assets from.
///
/// Paths are `/`-separated and relative to the resolver base. Both calls
/// are made from the server's worker tasks.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    async fn exists(&self, path: &str) -> bool;

    async fn read_all(&self, path: &str) -> Result<Vec<u8>>;

    fn kind(&self) -> ContentSource;
}

/// Build the resolver for `content.source`, resolving `Auto` per target.
///
/// `base_dir` roots the filesystem backend. The network backend needs
/// `content.base_url`, a main loop to issue its requests from, and a
/// running tokio runtime to drive them.
pub fn resolver_for(
    content: &ContentConfig,
    base_dir: impl Into<PathBuf>,
    main_loop: &MainLoopHandle,
) -> Result<Arc<dyn ContentResolver>> {
    match content.source.resolve() {
        ContentSource::Network => {
            let base_url = content.base_url.clone().ok_or_else(|| {
                ConfigError::ValidationError(
                    "content.base_url is required for the network source".into(),
                )
            })?;
            let runtime = tokio::runtime::Handle::try_current()
                .map_err(|e| WaxError::Server(format!("network resolver needs a runtime: {e}")))?;
            let resolver = NetworkResolver::new(base_url, main_loop.clone(), runtime)?;
            Ok(Arc::new(resolver))
        }
        _ => Ok(Arc::new(FileSystemResolver::new(base_dir))),
    }
}
