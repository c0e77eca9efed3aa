//! Work submission to the thread that owns the UI / platform APIs.
//!
//! Components running on background threads never touch platform objects
//! directly; they post jobs through a [`MainLoopHandle`] and the owning thread
//! executes them from its event loop via [`MainLoop::pump`] or blocks on
//! [`MainLoop::run`].

use std::future::Future;
use std::sync::mpsc;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::errors::WaxError;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Receiving end. Lives on the thread that must run the jobs.
pub struct MainLoop {
    jobs: mpsc::Receiver<Job>,
}

/// Cloneable submission end.
#[derive(Clone)]
pub struct MainLoopHandle {
    jobs: mpsc::Sender<Job>,
}

impl MainLoop {
    pub fn new() -> (Self, MainLoopHandle) {
        let (tx, rx) = mpsc::channel();
        (Self { jobs: rx }, MainLoopHandle { jobs: tx })
    }

    /// Run every job queued so far without blocking. Returns how many ran.
    pub fn pump(&self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.jobs.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Wait up to `timeout` for the next job, then drain the queue.
    pub fn pump_timeout(&self, timeout: Duration) -> usize {
        match self.jobs.recv_timeout(timeout) {
            Ok(job) => {
                job();
                1 + self.pump()
            }
            Err(_) => 0,
        }
    }

    /// Block executing jobs until every handle has been dropped.
    pub fn run(self) {
        while let Ok(job) = self.jobs.recv() {
            job();
        }
        tracing::debug!("main loop drained, all handles dropped");
    }
}

impl MainLoopHandle {
    /// Queue a job without waiting for it.
    pub fn post<F>(&self, f: F) -> Result<(), WaxError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.jobs
            .send(Box::new(f))
            .map_err(|_| WaxError::MainLoopClosed)
    }

    /// Queue a job and get its return value back as a future.
    ///
    /// Submission happens immediately; the returned future only waits.
    pub fn call<F, R>(&self, f: F) -> impl Future<Output = Result<R, WaxError>> + Send + 'static
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let submitted = self.post(move || {
            let _ = tx.send(f());
        });
        async move {
            submitted?;
            rx.await.map_err(|_| WaxError::MainLoopClosed)
        }
    }
}
