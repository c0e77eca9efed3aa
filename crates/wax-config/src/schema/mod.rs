//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod content;
mod display;
mod remote;
mod server;
mod system;

pub use content::*;
pub use display::*;
pub use remote::*;
pub use server::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WaxConfig {
    pub server: ServerConfig,
    pub content: ContentConfig,
    pub display: DisplayConfig,
    pub remote: RemoteConfig,
    pub logging: LoggingConfig,
}
