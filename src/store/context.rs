//! Execution context carried into every storage call.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::StoreError;

// == Context ==
/// Cancellation signal and optional deadline for one or more store calls.
///
/// Clones share the same cancellation state. A context made with
/// [`Context::child`] is cancelled together with its parent but can also be
/// cancelled on its own.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    // == Constructors ==
    /// Returns a context with no deadline that nobody else can cancel.
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns a context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Returns a context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Returns a context cancelled whenever this one is.
    ///
    /// The child keeps the parent's deadline.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    // == Cancellation ==
    /// Cancels this context, its clones and its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns true once the context has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the reason this context is done, or `None` while it is live.
    ///
    /// Cancellation takes precedence over an elapsed deadline.
    pub fn err(&self) -> Option<StoreError> {
        if self.token.is_cancelled() {
            return Some(StoreError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(StoreError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Waits until the context is cancelled or its deadline passes.
    pub async fn done(&self) -> StoreError {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => StoreError::Cancelled,
            _ = deadline_elapsed(self.deadline) => StoreError::DeadlineExceeded,
        }
    }

    // == Run ==
    /// Drives `fut` until it completes or the context ends, whichever comes
    /// first.
    ///
    /// Backends with real I/O wrap their engine calls with this so a
    /// cancelled caller does not wait on the engine. The abandoned future is
    /// dropped; any side effect it already caused is left in place.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            res = fut => res,
        }
    }
}

async fn deadline_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
