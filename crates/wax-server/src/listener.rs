//! Accept loop adapter for `axum::serve`.

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::serve::Listener;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, warn};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// TCP listener that keeps accepting across transient errors.
///
/// Errors seen after the owning server cleared its running flag are
/// shutdown noise and only logged at debug level.
pub(crate) struct LoopbackListener {
    inner: TcpListener,
    running: Arc<AtomicBool>,
}

impl LoopbackListener {
    pub(crate) fn new(inner: TcpListener, running: Arc<AtomicBool>) -> Self {
        Self { inner, running }
    }
}

impl Listener for LoopbackListener {
    type Io = TcpStream;
    type Addr = SocketAddr;

    async fn accept(&mut self) -> (Self::Io, Self::Addr) {
        loop {
            match self.inner.accept().await {
                Ok((stream, addr)) => {
                    debug!(%addr, "accepted connection");
                    return (stream, addr);
                }
                Err(e) if self.running.load(Ordering::SeqCst) => {
                    warn!(error = %e, "TCP accept error");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
                Err(e) => {
                    debug!(error = %e, "accept error during shutdown");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }

    fn local_addr(&self) -> io::Result<Self::Addr> {
        self.inner.local_addr()
    }
}
