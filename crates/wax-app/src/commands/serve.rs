//! `serve`: host the wallet content until Ctrl-C.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use wax_common::{MainLoop, Result};
use wax_config::WaxConfig;
use wax_server::{resolver_for, LocalServer};

const PUMP_INTERVAL: Duration = Duration::from_millis(100);

pub fn run(config: &WaxConfig) -> Result<()> {
    let runtime = super::runtime()?;
    let (main_loop, handle) = MainLoop::new();

    let resolver = {
        let _guard = runtime.enter();
        resolver_for(&config.content, std::env::current_dir()?, &handle)?
    };
    let mut server = LocalServer::new(config.server.clone(), resolver);
    server.start()?;
    println!("{}", server.url());

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            flag.store(true, Ordering::SeqCst);
        }
    });

    // Network content is fetched from jobs posted to this thread.
    while !stop.load(Ordering::SeqCst) {
        main_loop.pump_timeout(PUMP_INTERVAL);
    }

    info!("interrupted, stopping server");
    server.stop();
    Ok(())
}
