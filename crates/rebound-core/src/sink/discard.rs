use crate::sink::backend::{AttemptEvent, AttemptSink};

/// Sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl AttemptSink for DiscardSink {
    #[inline(always)]
    fn record(&self, _: &AttemptEvent<'_>) {}
}
