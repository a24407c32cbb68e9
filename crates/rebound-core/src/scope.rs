use std::{
    future::Future,
    sync::{Arc, OnceLock},
    time::Duration,
};

use tokio::{
    task::JoinHandle,
    time::{self, Instant},
};
use tokio_util::sync::CancellationToken;

use crate::error::ScopeError;

/// Cancellable, possibly deadline-bound context handed to each attempt.
///
/// The scope is only guaranteed to be meaningful during the attempt it was passed to.
/// Once it reports an error, the same error is reported from then on.
#[derive(Clone, Debug)]
pub struct ExecScope {
    token: CancellationToken,
    deadline: Option<Instant>,
    settled: Arc<OnceLock<ScopeError>>,
}

impl ExecScope {
    fn new(token: CancellationToken, deadline: Option<Instant>) -> Self {
        Self {
            token,
            deadline,
            settled: Arc::new(OnceLock::new()),
        }
    }

    /// Token cancelled when the scope is done, by the parent or by the deadline.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the scope is done, or `None` while it is still valid.
    ///
    /// The cause that fired first wins. A cancelled token the deadline watcher did not settle
    /// was cancelled by the parent or by the session releasing the scope.
    pub fn error(&self) -> Option<ScopeError> {
        if let Some(e) = self.settled.get() {
            return Some(*e);
        }
        let observed = if self.token.is_cancelled() {
            ScopeError::Cancelled
        } else if self.deadline.is_some_and(|d| Instant::now() >= d) {
            ScopeError::DeadlineExceeded
        } else {
            return None;
        };
        Some(*self.settled.get_or_init(|| observed))
    }

    pub fn is_done(&self) -> bool {
        self.error().is_some()
    }

    /// Resolves once the scope is cancelled or its deadline passes.
    pub async fn done(&self) -> ScopeError {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => {}
                    _ = time::sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
        self.error().unwrap_or(ScopeError::Cancelled)
    }

    /// Drive `fut` to completion unless the scope finishes first.
    pub async fn run_until_done<F: Future>(&self, fut: F) -> Result<F::Output, ScopeError> {
        tokio::select! {
            biased;
            e = self.done() => Err(e),
            out = fut => Ok(out),
        }
    }
}

/// Owner of the scope used by a session.
///
/// A timeout-bound scope gets a child token and a watcher task that settles the scope with
/// whichever of parent cancellation or deadline fires first, then cancels the child.
/// Dropping the guard stops the watcher and releases the child token.
pub(crate) struct ScopeGuard {
    scope: ExecScope,
    owned: bool,
    watcher: Option<JoinHandle<()>>,
}

impl ScopeGuard {
    /// Scope for `parent`, bound by `timeout` when one is given.
    ///
    /// Must be called within a tokio runtime when `timeout` is set.
    pub(crate) fn new(parent: &CancellationToken, timeout: Option<Duration>) -> Self {
        let Some(timeout) = timeout else {
            return Self {
                scope: ExecScope::new(parent.clone(), None),
                owned: false,
                watcher: None,
            };
        };

        let scope = ExecScope::new(parent.child_token(), Instant::now().checked_add(timeout));
        let watcher = scope
            .deadline
            .map(|deadline| tokio::spawn(watch(parent.clone(), scope.clone(), deadline)));

        Self {
            scope,
            owned: true,
            watcher,
        }
    }

    pub(crate) fn scope(&self) -> &ExecScope {
        &self.scope
    }
}

async fn watch(parent: CancellationToken, scope: ExecScope, deadline: Instant) {
    let cause = tokio::select! {
        biased;
        _ = parent.cancelled() => ScopeError::Cancelled,
        _ = time::sleep_until(deadline) => ScopeError::DeadlineExceeded,
    };
    let _ = scope.settled.set(cause);
    scope.token.cancel();
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
        if self.owned {
            self.scope.token.cancel();
        }
    }
}
