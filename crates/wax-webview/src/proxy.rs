//! Thread-safe handles the bridge uses to drive UI-thread surfaces.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use wax_bridge::{DisplaySurface, SurfaceEvent, SurfaceFactory, SurfaceOptions};
use wax_common::{Result, WaxError};

use crate::events::{SurfaceCommand, SurfaceId};
use crate::host::SurfaceHost;

/// Factory plus the host that must be pumped on the UI thread.
pub fn surface_channel(width: u32, height: u32) -> (WryDisplayFactory, SurfaceHost) {
    let (tx, rx) = mpsc::channel();
    let factory = WryDisplayFactory {
        commands: tx,
        next_id: AtomicU64::new(1),
    };
    (factory, SurfaceHost::new(rx, width, height))
}

pub struct WryDisplayFactory {
    commands: Sender<SurfaceCommand>,
    next_id: AtomicU64,
}

impl SurfaceFactory for WryDisplayFactory {
    fn open(
        &self,
        options: &SurfaceOptions,
        events: UnboundedSender<SurfaceEvent>,
    ) -> Result<Box<dyn DisplaySurface>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        send(
            &self.commands,
            SurfaceCommand::Open {
                id,
                options: options.clone(),
                events,
            },
        )?;
        debug!(id, "surface opened");
        Ok(Box::new(WryDisplay {
            id,
            commands: self.commands.clone(),
            closed: false,
        }))
    }
}

pub struct WryDisplay {
    id: SurfaceId,
    commands: Sender<SurfaceCommand>,
    closed: bool,
}

impl DisplaySurface for WryDisplay {
    fn load(&mut self, url: &str) -> Result<()> {
        send(
            &self.commands,
            SurfaceCommand::Load {
                id: self.id,
                url: url.to_string(),
            },
        )
    }

    fn show(&mut self) -> Result<()> {
        send(&self.commands, SurfaceCommand::Show { id: self.id })
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            let _ = self.commands.send(SurfaceCommand::Close { id: self.id });
        }
    }
}

impl Drop for WryDisplay {
    fn drop(&mut self) {
        self.close();
    }
}

fn send(commands: &Sender<SurfaceCommand>, command: SurfaceCommand) -> Result<()> {
    commands
        .send(command)
        .map_err(|_| WaxError::SurfaceUnavailable("UI thread is gone".into()))
}
