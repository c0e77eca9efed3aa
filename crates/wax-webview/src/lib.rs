//! wry-backed display surface for the wallet bridge.
//!
//! The bridge runs on a tokio runtime and only holds [`WryDisplay`]
//! proxies; the webviews themselves live in a [`SurfaceHost`] pumped by the
//! UI thread that owns the parent window.

pub mod events;
pub mod host;
pub mod ipc;
pub mod navigation;
pub mod proxy;

pub use events::{PageLoadState, SurfaceCommand, SurfaceId};
pub use host::{fill_rect, SurfaceHost};
pub use ipc::{IpcMessage, IPC_INIT_SCRIPT};
pub use navigation::{decide, is_error_page, NavigationDecision};
pub use proxy::{surface_channel, WryDisplay, WryDisplayFactory};
