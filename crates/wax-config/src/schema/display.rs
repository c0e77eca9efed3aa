//! Display surface settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Custom user agent bound to one platform (`std::env::consts::OS` name).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformUserAgent {
    pub platform: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    pub use_custom_user_agent: bool,
    pub user_agents: Vec<PlatformUserAgent>,
    /// Seconds to wait for a callback; 0 waits until the surface closes.
    pub callback_timeout_secs: u64,
    pub width: u32,
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_custom_user_agent: false,
            user_agents: Vec::new(),
            callback_timeout_secs: 0,
            width: 1280,
            height: 800,
        }
    }
}

impl DisplayConfig {
    /// User agent override for `platform`, if enabled and non-empty.
    pub fn user_agent_for(&self, platform: &str) -> Option<&str> {
        if !self.use_custom_user_agent {
            return None;
        }
        self.user_agents
            .iter()
            .find(|ua| ua.platform.eq_ignore_ascii_case(platform))
            .map(|ua| ua.user_agent.as_str())
            .filter(|ua| !ua.is_empty())
    }

    /// User agent override for the platform this binary runs on.
    pub fn current_user_agent(&self) -> Option<&str> {
        self.user_agent_for(std::env::consts::OS)
    }

    pub fn callback_timeout(&self) -> Option<Duration> {
        (self.callback_timeout_secs > 0).then(|| Duration::from_secs(self.callback_timeout_secs))
    }
}
