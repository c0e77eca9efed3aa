//! Commands sent to the UI thread and webview page-load states.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use wax_bridge::{SurfaceEvent, SurfaceOptions};

pub type SurfaceId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    Started,
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// What a [`crate::WryDisplay`] asks the UI thread to do.
#[derive(Debug)]
pub enum SurfaceCommand {
    Open {
        id: SurfaceId,
        options: SurfaceOptions,
        events: UnboundedSender<SurfaceEvent>,
    },
    Load { id: SurfaceId, url: String },
    Show { id: SurfaceId },
    Close { id: SurfaceId },
}

impl SurfaceCommand {
    pub fn id(&self) -> SurfaceId {
        match self {
            SurfaceCommand::Open { id, .. }
            | SurfaceCommand::Load { id, .. }
            | SurfaceCommand::Show { id }
            | SurfaceCommand::Close { id } => *id,
        }
    }
}
