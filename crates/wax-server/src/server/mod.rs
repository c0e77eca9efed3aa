//! Background loopback server lifecycle.


use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use wax_common::{Result, WaxError};
use wax_config::ServerConfig;

use crate::content::ContentResolver;
use crate::handler::{serve_asset, AssetState};
use crate::listener::LoopbackListener;

/// How long in-flight connections may finish after `stop` before being dropped.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Local HTTP server serving the bundled wallet content.
///
/// `start` and `stop` are idempotent. When `stop` returns the background
/// thread has been joined and the port is closed. Dropping a running server
/// stops it.
pub struct LocalServer {
    config: ServerConfig,
    resolver: Arc<dyn ContentResolver>,
    running: Arc<AtomicBool>,
    session: Option<Session>,
}

struct Session {
    addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    thread: JoinHandle<()>,
}

impl LocalServer {
    pub fn new(config: ServerConfig, resolver: Arc<dyn ContentResolver>) -> Self {
        Self {
            config,
            resolver,
            running: Arc::new(AtomicBool::new(false)),
            session: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Address actually bound, while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.session.as_ref().map(|s| s.addr)
    }

    /// Base URL of the server. Uses the bound port while running, so a
    /// configured port of 0 reports the ephemeral port.
    pub fn url(&self) -> String {
        match self.local_addr() {
            Some(addr) => format!("http://{addr}/"),
            None => self.config.url(),
        }
    }

    /// Bind the listener and spawn the serving thread.
    ///
    /// Bind failures are returned to the caller. Calling `start` on a
    /// running server logs a warning and does nothing.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            warn!(url = %self.url(), "local server already running");
            return Ok(());
        }

        let bind_addr = self.config.authority();
        let std_listener = std::net::TcpListener::bind(&bind_addr)
            .map_err(|e| WaxError::Transport(format!("failed to bind {bind_addr}: {e}")))?;
        std_listener.set_nonblocking(true)?;
        let addr = std_listener.local_addr()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("wax-server-worker")
            .enable_all()
            .build()
            .map_err(|e| WaxError::Server(format!("failed to build server runtime: {e}")))?;

        let listener = {
            let _guard = runtime.enter();
            tokio::net::TcpListener::from_std(std_listener)?
        };

        let state = Arc::new(AssetState {
            resolver: Arc::clone(&self.resolver),
            content_root: self.config.content_dir.clone(),
        });
        let app = Router::new()
            .fallback(serve_asset)
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);

        let thread = std::thread::Builder::new()
            .name("wax-local-server".into())
            .spawn(move || {
                let listener = LoopbackListener::new(listener, running);
                runtime.block_on(serve(listener, app, shutdown_rx));
                runtime.shutdown_timeout(Duration::from_millis(100));
                debug!("server thread exiting");
            });

        let thread = match thread {
            Ok(thread) => thread,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(WaxError::Server(format!("failed to spawn server thread: {e}")));
            }
        };

        self.session = Some(Session {
            addr,
            shutdown: shutdown_tx,
            thread,
        });
        info!(url = %self.url(), "local server started");
        Ok(())
    }

    /// Stop serving and join the background thread.
    ///
    /// Calling `stop` on a stopped server logs and does nothing.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            debug!("local server is not running");
            return;
        };

        self.running.store(false, Ordering::SeqCst);
        let _ = session.shutdown.send(true);
        if session.thread.join().is_err() {
            error!("local server thread panicked");
        }
        info!(addr = %session.addr, "local server stopped");
    }
}

impl Drop for LocalServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn serve(listener: LoopbackListener, app: Router, shutdown: watch::Receiver<bool>) {
    let mut graceful_rx = shutdown.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = graceful_rx.wait_for(|stop| *stop).await;
    });

    let mut grace_rx = shutdown;
    let deadline = async move {
        let _ = grace_rx.wait_for(|stop| *stop).await;
        tokio::time::sleep(SHUTDOWN_GRACE).await;
    };

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!(error = %e, "local server failed");
            }
        }
        _ = deadline => {
            warn!("abandoning in-flight connections after shutdown grace period");
        }
    }
}
