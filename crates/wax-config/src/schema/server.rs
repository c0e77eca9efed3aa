//! Loopback server settings.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 2023;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind. Must be a loopback address.
    pub host: String,
    pub port: u16,
    /// Root of the bundled wallet content, relative to the resolver base.
    pub content_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: DEFAULT_PORT,
            content_dir: "assets/wax-web".into(),
        }
    }
}

impl ServerConfig {
    /// `host:port`, with IPv6 hosts in brackets.
    pub fn authority(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// `http://host:port/` for the configured (not necessarily bound) port.
    pub fn url(&self) -> String {
        format!("http://{}/", self.authority())
    }
}
