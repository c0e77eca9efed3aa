//! Host window for the wallet surface.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{error, info};
use wax_common::{MainLoop, Result, WaxError};
use wax_webview::SurfaceHost;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowAttributes, WindowId};

const POLL_INTERVAL: Duration = Duration::from_millis(16);

pub struct WalletWindow {
    title: String,
    size: (u32, u32),
    window: Option<Window>,
    shown: bool,
    host: SurfaceHost,
    main_loop: MainLoop,
    done: Receiver<Result<Value>>,
    result: Option<Result<Value>>,
}

impl WalletWindow {
    pub fn new(
        title: String,
        size: (u32, u32),
        host: SurfaceHost,
        main_loop: MainLoop,
        done: Receiver<Result<Value>>,
    ) -> Self {
        Self {
            title,
            size,
            window: None,
            shown: false,
            host,
            main_loop,
            done,
            result: None,
        }
    }

    pub fn take_result(&mut self) -> Option<Result<Value>> {
        self.result.take()
    }

    fn finish(&mut self, event_loop: &ActiveEventLoop, result: Result<Value>) {
        self.result = Some(result);
        event_loop.exit();
    }
}

impl ApplicationHandler for WalletWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_visible(false)
            .with_inner_size(winit::dpi::LogicalSize::new(
                f64::from(self.size.0),
                f64::from(self.size.1),
            ));
        match event_loop.create_window(attrs) {
            Ok(window) => self.window = Some(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                self.finish(
                    event_loop,
                    Err(WaxError::SurfaceUnavailable(format!("failed to create window: {e}"))),
                );
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window close requested");
                self.host.close_all();
                if let Some(window) = &self.window {
                    window.set_visible(false);
                    self.shown = false;
                }
            }
            WindowEvent::Resized(size) if size.width > 0 && size.height > 0 => {
                if let Some(window) = &self.window {
                    let logical = size.to_logical::<f64>(window.scale_factor());
                    self.host.set_size(logical.width as u32, logical.height as u32);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.main_loop.pump();

        if let Some(window) = &self.window {
            self.host.pump(window);
            let visible = self.host.has_visible();
            if visible != self.shown {
                window.set_visible(visible);
                self.shown = visible;
            }
        }

        match self.done.try_recv() {
            Ok(result) => return self.finish(event_loop, result),
            Err(TryRecvError::Disconnected) => {
                return self.finish(
                    event_loop,
                    Err(WaxError::Unhandled("bridge thread exited without a result".into())),
                );
            }
            Err(TryRecvError::Empty) => {}
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }
}
