//! Reporting of retried attempts.
//!
//! The executor hands every retry and restart to an [`AttemptSink`] stored in the session
//! config. [`DiscardSink`] is the default; [`TracingSink`] forwards attempts to `tracing`.
mod backend;
pub use backend::{AttemptEvent, AttemptSink, SinkHandle};

mod discard;
pub use discard::DiscardSink;

mod log;
pub use log::TracingSink;

use std::sync::Arc;

/// Create a sink that drops every event.
#[inline]
pub fn discard_sink() -> SinkHandle {
    Arc::new(DiscardSink)
}

/// Create a sink that emits `tracing` events.
#[inline]
pub fn tracing_sink() -> SinkHandle {
    Arc::new(TracingSink)
}
