//! Display surface abstraction.
//!
//! The surface is owned by the UI thread; the bridge only talks to it
//! through these traits and receives what happens to it as
//! [`SurfaceEvent`]s on a channel.

use tokio::sync::mpsc;
use wax_common::Result;

/// Something the display surface reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A page finished loading.
    PageLoaded { url: String },
    /// The page navigated to a callback URL (already intercepted).
    Message(String),
    /// The page failed to load.
    LoadError { code: i32, message: String },
    /// The user or the page closed the surface.
    CloseRequested,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceOptions {
    pub user_agent: Option<String>,
    /// Load without ever showing the surface.
    pub silent: bool,
}

pub trait DisplaySurface: Send {
    fn load(&mut self, url: &str) -> Result<()>;

    fn show(&mut self) -> Result<()>;

    /// Hide and destroy. Safe to call more than once.
    fn close(&mut self);
}

/// Creates surfaces that report into the given event channel.
pub trait SurfaceFactory: Send + Sync {
    fn open(
        &self,
        options: &SurfaceOptions,
        events: mpsc::UnboundedSender<SurfaceEvent>,
    ) -> Result<Box<dyn DisplaySurface>>;
}
