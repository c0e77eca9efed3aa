//! AtomicAssets API client: NFT listings by owner and asset images by
//! content hash.

pub mod client;
pub mod types;

pub use client::AtomicAssetsClient;
pub use types::{AssetItem, AssetQuery, UserAssetsResponse};
