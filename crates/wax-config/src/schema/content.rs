//! Where bundled content is read from.

use serde::{Deserialize, Serialize};

/// Storage backend for the bundled wallet content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// Pick per target: packaged network retrieval on Android/wasm,
    /// direct filesystem elsewhere.
    #[default]
    Auto,
    FileSystem,
    Network,
}

impl ContentSource {
    /// Collapse `Auto` to the concrete backend for the compiled target.
    pub fn resolve(self) -> ContentSource {
        match self {
            ContentSource::Auto => {
                if cfg!(any(target_os = "android", target_arch = "wasm32")) {
                    ContentSource::Network
                } else {
                    ContentSource::FileSystem
                }
            }
            other => other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ContentConfig {
    pub source: ContentSource,
    /// Base URL for the network backend (e.g. `jar:file:///...!/assets`).
    pub base_url: Option<String>,
}
