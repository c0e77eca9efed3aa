//! UI-thread owner of the bridge's webviews.

use std::collections::HashMap;
use std::sync::mpsc::Receiver;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use wax_bridge::{SurfaceEvent, SurfaceOptions};
use wry::raw_window_handle::HasWindowHandle;
use wry::{WebView, WebViewBuilder};

use crate::events::{PageLoadState, SurfaceCommand, SurfaceId};
use crate::ipc::{IpcMessage, IPC_INIT_SCRIPT};
use crate::navigation::{decide, is_error_page, NavigationDecision};

/// Bounds covering a `width` x `height` window from its origin.
pub fn fill_rect(width: u32, height: u32) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(0.0, 0.0)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(f64::from(width), f64::from(height))),
    }
}

struct HostedSurface {
    options: SurfaceOptions,
    events: UnboundedSender<SurfaceEvent>,
    webview: Option<WebView>,
    visible: bool,
}

pub struct SurfaceHost {
    commands: Receiver<SurfaceCommand>,
    surfaces: HashMap<SurfaceId, HostedSurface>,
    bounds: wry::Rect,
}

impl SurfaceHost {
    pub(crate) fn new(commands: Receiver<SurfaceCommand>, width: u32, height: u32) -> Self {
        Self {
            commands,
            surfaces: HashMap::new(),
            bounds: fill_rect(width, height),
        }
    }

    /// Apply every queued command. Returns how many were handled.
    pub fn pump<W: HasWindowHandle>(&mut self, window: &W) -> usize {
        let mut handled = 0;
        while let Ok(command) = self.commands.try_recv() {
            self.apply(window, command);
            handled += 1;
        }
        handled
    }

    /// Whether any surface is currently meant to be on screen.
    pub fn has_visible(&self) -> bool {
        self.surfaces.values().any(|s| s.visible)
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.bounds = fill_rect(width, height);
        for surface in self.surfaces.values() {
            if let Some(webview) = &surface.webview {
                if let Err(e) = webview.set_bounds(self.bounds) {
                    warn!(error = %e, "failed to resize surface");
                }
            }
        }
    }

    /// The user closed the window: every open surface reports a close.
    pub fn close_all(&mut self) {
        for (id, surface) in self.surfaces.drain() {
            debug!(id, "surface closed by user");
            let _ = surface.events.send(SurfaceEvent::CloseRequested);
        }
    }

    fn apply<W: HasWindowHandle>(&mut self, window: &W, command: SurfaceCommand) {
        match command {
            SurfaceCommand::Open { id, options, events } => {
                self.surfaces.insert(
                    id,
                    HostedSurface {
                        options,
                        events,
                        webview: None,
                        visible: false,
                    },
                );
            }
            SurfaceCommand::Load { id, url } => {
                let bounds = self.bounds;
                let Some(surface) = self.surfaces.get_mut(&id) else {
                    warn!(id, "load for unknown surface");
                    return;
                };
                let result = match &surface.webview {
                    Some(webview) => webview.load_url(&url),
                    None => build(window, id, surface, bounds, &url).map(|webview| {
                        surface.webview = Some(webview);
                    }),
                };
                if let Err(e) = result {
                    warn!(id, error = %e, "surface failed to load");
                    let _ = surface.events.send(SurfaceEvent::LoadError {
                        code: -1,
                        message: e.to_string(),
                    });
                }
            }
            SurfaceCommand::Show { id } => {
                if let Some(surface) = self.surfaces.get_mut(&id) {
                    surface.visible = true;
                    if let Some(webview) = &surface.webview {
                        if let Err(e) = webview.set_visible(true) {
                            warn!(id, error = %e, "failed to show surface");
                        }
                    }
                }
            }
            SurfaceCommand::Close { id } => {
                if self.surfaces.remove(&id).is_some() {
                    debug!(id, "surface destroyed");
                }
            }
        }
    }
}

fn build<W: HasWindowHandle>(
    window: &W,
    id: SurfaceId,
    surface: &HostedSurface,
    bounds: wry::Rect,
    url: &str,
) -> Result<WebView, wry::Error> {
    let mut builder = WebViewBuilder::new()
        .with_bounds(bounds)
        .with_visible(surface.visible)
        .with_devtools(cfg!(debug_assertions))
        .with_initialization_script(IPC_INIT_SCRIPT)
        .with_url(url);

    if let Some(ua) = &surface.options.user_agent {
        builder = builder.with_user_agent(ua);
    }

    let events = surface.events.clone();
    builder = builder.with_navigation_handler(move |url| match decide(&url) {
        NavigationDecision::Allow => true,
        NavigationDecision::Intercept => {
            debug!(id, "callback intercepted");
            let _ = events.send(SurfaceEvent::Message(url));
            false
        }
        NavigationDecision::Block => {
            warn!(id, %url, "navigation blocked");
            false
        }
    });

    let events = surface.events.clone();
    builder = builder.with_on_page_load_handler(move |event, url| {
        let state = PageLoadState::from(event);
        debug!(id, ?state, %url, "page load");
        if state != PageLoadState::Finished {
            return;
        }
        let event = if is_error_page(&url) {
            warn!(id, %url, "surface landed on an error page");
            SurfaceEvent::LoadError {
                code: -1,
                message: format!("page failed to load: {url}"),
            }
        } else {
            SurfaceEvent::PageLoaded { url }
        };
        let _ = events.send(event);
    });

    let events = surface.events.clone();
    builder = builder.with_ipc_handler(move |request| {
        match IpcMessage::from_json(request.body()).and_then(IpcMessage::into_event) {
            Some(event) => {
                let _ = events.send(event);
            }
            None => warn!(id, "ignored IPC message"),
        }
    });

    let webview = builder.build_as_child(window)?;
    info!(id, silent = surface.options.silent, "surface created");
    Ok(webview)
}
