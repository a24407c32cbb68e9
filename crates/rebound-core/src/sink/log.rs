use tracing::{Level, debug, error, info, trace, warn};

use crate::sink::backend::{AttemptEvent, AttemptSink};

/// Sink that emits one `tracing` event per reported attempt, at the session level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

const MESSAGE: &str = "attempt failed, retrying";

impl AttemptSink for TracingSink {
    fn record(&self, event: &AttemptEvent<'_>) {
        let kind = event.kind.as_label();
        let attempt = event.attempt;
        let delay_ms = event.delay.as_millis() as u64;
        let cause = event.cause;

        match event.level {
            Level::ERROR => error!(kind, attempt, delay_ms, error = %cause, "{MESSAGE}"),
            Level::WARN => warn!(kind, attempt, delay_ms, error = %cause, "{MESSAGE}"),
            Level::INFO => info!(kind, attempt, delay_ms, error = %cause, "{MESSAGE}"),
            Level::DEBUG => debug!(kind, attempt, delay_ms, error = %cause, "{MESSAGE}"),
            _ => trace!(kind, attempt, delay_ms, error = %cause, "{MESSAGE}"),
        }
    }
}
