//! Messages the page posts through `window.ipc.postMessage`.
//!
//! Only two things travel this way: resource failures the page can see and
//! `window.close()`. Results never do; those arrive as callback navigations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wax_bridge::SurfaceEvent;

pub const KIND_LOAD_ERROR: &str = "loadError";
pub const KIND_CLOSE: &str = "close";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcMessage {
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl IpcMessage {
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// The surface event this message stands for, if any.
    pub fn into_event(self) -> Option<SurfaceEvent> {
        match self.kind.as_str() {
            KIND_CLOSE => Some(SurfaceEvent::CloseRequested),
            KIND_LOAD_ERROR => {
                let code = self.payload["code"]
                    .as_i64()
                    .and_then(|c| i32::try_from(c).ok())
                    .unwrap_or(-1);
                let message = self.payload["message"]
                    .as_str()
                    .unwrap_or("unknown load error")
                    .to_string();
                Some(SurfaceEvent::LoadError { code, message })
            }
            _ => None,
        }
    }
}

/// Injected into every surface before the page's own scripts run.
pub const IPC_INIT_SCRIPT: &str = r#"
(function() {
    function post(kind, payload) {
        window.ipc.postMessage(JSON.stringify({ kind: kind, payload: payload || null }));
    }
    window.coconutWax = {
        loadError: function(code, message) {
            post('loadError', { code: code, message: String(message) });
        }
    };
    window.addEventListener('error', function(e) {
        var t = e.target;
        if (t && t !== window && t.tagName === 'SCRIPT') {
            post('loadError', { code: -1, message: 'failed to load ' + t.src });
        }
    }, true);
    window.close = function() { post('close'); };
})();
"#;
