//! Retry execution with backoff, jitter, timeouts and restart signals.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use rebound_core::{ExecScope, ResultExt, RetryConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn fetch(_: &ExecScope) -> Result<String, std::io::Error> { Ok(String::new()) }
//! # async fn example() -> Result<(), rebound_core::RetryError> {
//! let cfg = RetryConfig::new(Duration::from_millis(200))
//!     .with_scale(2.0)
//!     .with_max_delay(Duration::from_secs(5))
//!     .with_timeout(Duration::from_secs(30));
//!
//! let body = rebound_core::run1(&CancellationToken::new(), &cfg, |scope| async move {
//!     Ok(fetch(&scope).await.retriable()?)
//! })
//! .await?;
//! # let _ = body;
//! # Ok(())
//! # }
//! ```
use std::future::Future;

use tokio_util::sync::CancellationToken;

mod config;
pub use config::{Backoff, DEFAULT_JITTER, NO_JITTER, RetryConfig, UNBOUNDED};

mod error;
pub use error::{ConfigError, CoreError, RetryError, ScopeError};

mod executor;
pub use executor::RetryExecutor;

pub mod map;

mod scope;
pub use scope::ExecScope;

mod signal;
pub use signal::{
    BoxError, Outcome, ResultExt, Signal, SignalKind, classify, restartable, restartable_opt,
    retriable, retriable_opt,
};

pub mod sink;
pub use sink::{AttemptEvent, AttemptSink, DiscardSink, SinkHandle, TracingSink};

mod sleeper;
pub use sleeper::{Sleeper, SleeperHandle, TokioSleeper};

/// Run `op` with retries using a default [`RetryExecutor`].
pub async fn run<F, Fut>(
    cancel: &CancellationToken,
    cfg: &RetryConfig,
    op: F,
) -> Result<(), RetryError>
where
    F: FnMut(ExecScope) -> Fut,
    Fut: Future<Output = Result<(), BoxError>>,
{
    RetryExecutor::new().run(cancel, cfg, op).await
}

/// Run `op` with retries using a default [`RetryExecutor`], returning its value.
pub async fn run1<T, F, Fut>(
    cancel: &CancellationToken,
    cfg: &RetryConfig,
    op: F,
) -> Result<T, RetryError>
where
    F: FnMut(ExecScope) -> Fut,
    Fut: Future<Output = Result<T, BoxError>>,
{
    RetryExecutor::new().run1(cancel, cfg, op).await
}

pub mod prelude {
    pub use crate::config::RetryConfig;
    pub use crate::error::{RetryError, ScopeError};
    pub use crate::executor::RetryExecutor;
    pub use crate::scope::ExecScope;
    pub use crate::signal::{BoxError, ResultExt, Signal};
}
