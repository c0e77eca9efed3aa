use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 50;

/// Filter for the `assets` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetQuery {
    pub owner: String,
    pub page: u32,
    pub limit: u32,
    pub is_transferable: Option<bool>,
    pub collection_name: Option<String>,
}

impl AssetQuery {
    pub fn owner(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            is_transferable: None,
            collection_name: None,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn transferable(mut self, transferable: bool) -> Self {
        self.is_transferable = Some(transferable);
        self
    }

    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into()).filter(|n: &String| !n.is_empty());
        self
    }

    /// Path and query relative to the API base.
    pub fn path(&self) -> String {
        let mut path = format!(
            "atomicassets/v1/assets?owner={}&page={}&limit={}",
            urlencoding::encode(&self.owner),
            self.page,
            self.limit
        );
        if let Some(transferable) = self.is_transferable {
            path.push_str(&format!("&is_transferable={transferable}"));
        }
        if let Some(collection) = &self.collection_name {
            path.push_str(&format!("&collection_name={}", urlencoding::encode(collection)));
        }
        path
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetItem<T = Value> {
    pub asset_id: String,
    #[serde(default)]
    pub is_transferable: bool,
    #[serde(default)]
    pub name: String,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAssetsResponse<T = Value> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<AssetItem<T>>,
}
