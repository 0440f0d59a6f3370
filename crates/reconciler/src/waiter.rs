//! Bounded waits on collaborator calls.
//!
//! Every collaborator call made during a run goes through a [`BoundedWaiter`].
//! On timeout the call's future is dropped, which is the cancellation request
//! to the collaborator; anything it already set in motion upstream may still
//! land.
//!
//! Port implementations whose backend reports completion through a callback
//! rather than a future bridge with [`completion`]: the callback fires the
//! [`CompletionSender`], and the port method returns the awaited
//! [`CompletionReceiver`] as its `BackendResult`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use fleet::{BackendError, BackendResult, Operation, SyncError, DEFAULT_TIMEOUT_SECS};
use tokio::sync::oneshot;

/// Applies one fixed timeout to every wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedWaiter {
    timeout: Duration,
}

impl Default for BoundedWaiter {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl BoundedWaiter {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Awaits `call`, failing with [`SyncError::Timeout`] if it does not finish
    /// in time and with [`SyncError::Backend`] if it reports failure.
    pub async fn wait<T, F>(&self, operation: Operation, call: F) -> Result<T, SyncError>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(SyncError::Backend { operation, source }),
            Err(_) => Err(SyncError::Timeout {
                operation,
                after: self.timeout,
            }),
        }
    }
}

/// Completing half of a one-shot completion signal.
#[derive(Debug)]
pub struct CompletionSender<T> {
    tx: oneshot::Sender<BackendResult<T>>,
}

impl<T> CompletionSender<T> {
    /// Fires the signal. Returns `false` if nobody is waiting any more (the
    /// waiter already timed out).
    pub fn complete(self, result: BackendResult<T>) -> bool {
        self.tx.send(result).is_ok()
    }

    /// Returns `true` once the waiter has given up, so a callback-style
    /// backend can stop early.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Waiting half of a one-shot completion signal.
///
/// Resolves to whatever the sender completed with. A sender dropped without
/// completing resolves to a [`BackendError`]. Dropping the receiver marks the
/// sender abandoned.
#[derive(Debug)]
pub struct CompletionReceiver<T> {
    rx: oneshot::Receiver<BackendResult<T>>,
}

impl<T> Future for CompletionReceiver<T> {
    type Output = BackendResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(BackendError::new(
                    "completion callback dropped before the operation finished",
                ))
            })
        })
    }
}

/// Creates a linked completion signal pair.
pub fn completion<T>() -> (CompletionSender<T>, CompletionReceiver<T>) {
    let (tx, rx) = oneshot::channel();
    (CompletionSender { tx }, CompletionReceiver { rx })
}
