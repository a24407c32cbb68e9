use std::{error::Error, sync::Arc, time::Duration};

use tracing::Level;

use crate::signal::SignalKind;

/// One retried attempt.
#[derive(Debug, Clone, Copy)]
pub struct AttemptEvent<'a> {
    /// Level configured for the session.
    pub level: Level,
    /// Retry or restart.
    pub kind: SignalKind,
    /// 1-based attempt number within the session.
    pub attempt: u32,
    /// Wait before the next attempt, jitter included.
    pub delay: Duration,
    /// Error carried by the signal.
    pub cause: &'a (dyn Error + Send + Sync + 'static),
}

/// Receiver of retried attempts.
///
/// Called synchronously from the retry loop, between an attempt and the wait that follows it.
/// Consecutive attempts failing with the same message are reported once.
pub trait AttemptSink: Send + Sync + 'static {
    fn record(&self, event: &AttemptEvent<'_>);
}

/// Shared handle to an attempt sink.
pub type SinkHandle = Arc<dyn AttemptSink>;
