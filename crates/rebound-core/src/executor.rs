//! The retry loop.
use std::{fmt, future::Future, sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{
    config::RetryConfig,
    error::{RetryError, ScopeError},
    scope::{ExecScope, ScopeGuard},
    signal::{BoxError, Outcome, classify},
    sink::AttemptEvent,
    sleeper::{SleeperHandle, TokioSleeper},
};

/// Runs operations with retries.
///
/// The executor itself is stateless apart from its sleeper; every call to [`run`](Self::run)
/// or [`run1`](Self::run1) is an independent session, and one executor can serve any number of
/// concurrent sessions.
#[derive(Clone)]
pub struct RetryExecutor {
    sleeper: SleeperHandle,
}

impl RetryExecutor {
    /// Executor waiting on the tokio timer.
    pub fn new() -> Self {
        Self::with_sleeper(Arc::new(TokioSleeper))
    }

    /// Executor waiting through the given sleeper.
    pub fn with_sleeper(sleeper: SleeperHandle) -> Self {
        Self { sleeper }
    }

    /// Run `op` with retries controlled by `cfg`.
    ///
    /// `op` requests another attempt by returning an error containing a
    /// [`Signal`](crate::Signal). Success and any other error end the session and are
    /// returned to the caller.
    ///
    /// The scope passed to `op` is valid only during one attempt, and may or may not be
    /// done afterwards.
    pub async fn run<F, Fut>(
        &self,
        cancel: &CancellationToken,
        cfg: &RetryConfig,
        op: F,
    ) -> Result<(), RetryError>
    where
        F: FnMut(ExecScope) -> Fut,
        Fut: Future<Output = Result<(), BoxError>>,
    {
        self.run1(cancel, cfg, op).await
    }

    /// Version of [`run`](Self::run) returning the value produced by the successful attempt.
    pub async fn run1<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        cfg: &RetryConfig,
        mut op: F,
    ) -> Result<T, RetryError>
    where
        F: FnMut(ExecScope) -> Fut,
        Fut: Future<Output = Result<T, BoxError>>,
    {
        let backoff = cfg.validate()?;
        let mut guard = ScopeGuard::new(cancel, backoff.timeout());

        if !backoff.pre_delay().is_zero() {
            self.wait(guard.scope(), backoff.pre_delay()).await?;
        }

        let mut delay = backoff.base();
        let mut last_reported: Option<String> = None;
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);

            let err = match op(guard.scope().clone()).await {
                Ok(value) => {
                    debug!(attempt, "operation succeeded");
                    return Ok(value);
                }
                Err(err) => err,
            };

            let signal = match classify(&*err) {
                Outcome::Terminal => {
                    debug!(attempt, error = %err, "operation failed, not retrying");
                    return Err(RetryError::Operation(err));
                }
                Outcome::Retry(signal) => signal,
                Outcome::Restart(signal) => {
                    delay = backoff.base();
                    if let Some(timeout) = backoff.timeout() {
                        drop(guard);
                        guard = ScopeGuard::new(cancel, Some(timeout));
                    }
                    signal
                }
            };

            let wait = backoff.jittered(delay, rand::random::<f64>());

            let message = signal.cause().to_string();
            if last_reported.as_deref() != Some(message.as_str()) {
                cfg.sink.record(&AttemptEvent {
                    level: cfg.level,
                    kind: signal.kind(),
                    attempt,
                    delay: wait,
                    cause: signal.cause(),
                });
                last_reported = Some(message);
            }

            trace!(
                attempt,
                kind = signal.kind().as_label(),
                wait_ms = wait.as_millis() as u64,
                "waiting before next attempt"
            );
            self.wait(guard.scope(), wait).await?;

            delay = backoff.next_delay(delay);
        }
    }

    /// Sleep for `delay` unless `scope` finishes first; ties go to the scope.
    async fn wait(&self, scope: &ExecScope, delay: Duration) -> Result<(), ScopeError> {
        tokio::select! {
            biased;
            e = scope.done() => {
                debug!(error = %e, "retry wait interrupted");
                Err(e)
            }
            _ = self.sleeper.sleep(delay) => Ok(()),
        }
    }
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RetryExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryExecutor")
            .field("sleeper", &"<handle>")
            .finish()
    }
}
