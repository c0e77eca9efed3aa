//! Single-shot result slot for one outstanding bridge call.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use wax_common::{Result, WaxError};

/// Create a linked completer/future pair.
pub fn pending<T>() -> (Completer<T>, PendingOperation<T>) {
    let (tx, rx) = oneshot::channel();
    (
        Completer {
            slot: Arc::new(Mutex::new(Some(tx))),
        },
        PendingOperation { rx },
    )
}

/// Write side. Cloneable; the first `complete` wins and the rest are no-ops.
pub struct Completer<T> {
    slot: Arc<Mutex<Option<oneshot::Sender<Result<T>>>>>,
}

impl<T> Clone for Completer<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Completer<T> {
    /// Resolve the operation. Returns `false` if it was already resolved.
    pub fn complete(&self, result: Result<T>) -> bool {
        let sender = match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match sender {
            Some(tx) => {
                let _ = tx.send(result);
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_resolved(&self) -> bool {
        match self.slot.lock() {
            Ok(slot) => slot.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }
}

/// Read side. Resolves to `Unhandled` if every completer is dropped unused.
pub struct PendingOperation<T> {
    rx: oneshot::Receiver<Result<T>>,
}

impl<T> Future for PendingOperation<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(WaxError::Unhandled(
                    "operation dropped without a result".into(),
                ))
            })
        })
    }
}
