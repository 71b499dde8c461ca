//! Single-shot settlement of an asynchronous operation.
//!
//! `channel` returns a `Resolver` and a `PendingOperation`. The resolver is
//! consumed by `resolve` or `reject`, so at most one outcome can ever be
//! delivered. If the resolver is dropped without settling (a worker that
//! never ran, or one that panicked past its handler) the pending side still
//! completes, with an `Unknown` rejection, instead of hanging.

use crate::error::{ErrorKind, Rejection};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Outcome of a settled operation.
pub type Settlement<T> = Result<T, Rejection>;

/// The settling half of a pending operation.
#[derive(Debug)]
pub struct Resolver<T> {
    tx: oneshot::Sender<Settlement<T>>,
}

impl<T> Resolver<T> {
    pub fn resolve(self, value: T) {
        self.settle(Ok(value));
    }

    pub fn reject(self, rejection: Rejection) {
        self.settle(Err(rejection));
    }

    pub fn settle(self, outcome: Settlement<T>) {
        if self.tx.send(outcome).is_err() {
            log::debug!("Operation settled after its caller stopped waiting");
        }
    }
}

/// A future resolving to the single outcome of an operation.
#[derive(Debug)]
#[must_use = "a pending operation does nothing observable unless awaited"]
pub struct PendingOperation<T> {
    rx: oneshot::Receiver<Settlement<T>>,
}

impl<T> PendingOperation<T> {
    /// A pending operation that is already settled.
    pub fn settled(outcome: Settlement<T>) -> Self {
        let (resolver, pending) = channel();
        resolver.settle(outcome);
        pending
    }
}

impl<T> Future for PendingOperation<T> {
    type Output = Settlement<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.get_mut().rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(Rejection::new(
                ErrorKind::Unknown,
                "operation was abandoned before it settled",
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Creates a connected resolver / pending operation pair.
pub fn channel<T>() -> (Resolver<T>, PendingOperation<T>) {
    let (tx, rx) = oneshot::channel();
    (Resolver { tx }, PendingOperation { rx })
}
