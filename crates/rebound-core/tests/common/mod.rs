#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use rebound_core::{AttemptEvent, AttemptSink, RetryExecutor, SignalKind, Sleeper};
use tokio_util::sync::CancellationToken;
use tracing::Level;

/// Records requested delays and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        self.delays.lock().unwrap().push(delay);
    }
}

/// Cancels `token` when asked to sleep for exactly `at`, then never wakes up.
/// Other delays return immediately.
pub struct CancelOnSleeper {
    pub token: CancellationToken,
    pub at: Duration,
}

#[async_trait]
impl Sleeper for CancelOnSleeper {
    async fn sleep(&self, delay: Duration) {
        if delay == self.at {
            self.token.cancel();
            std::future::pending::<()>().await;
        }
    }
}

pub fn recording() -> (RetryExecutor, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    (RetryExecutor::with_sleeper(sleeper.clone()), sleeper)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Seen {
    pub level: Level,
    pub kind: SignalKind,
    pub attempt: u32,
    pub delay: Duration,
    pub message: String,
}

/// Keeps every reported attempt.
#[derive(Default)]
pub struct CollectingSink {
    seen: Mutex<Vec<Seen>>,
}

impl CollectingSink {
    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

impl AttemptSink for CollectingSink {
    fn record(&self, event: &AttemptEvent<'_>) {
        self.seen.lock().unwrap().push(Seen {
            level: event.level,
            kind: event.kind,
            attempt: event.attempt,
            delay: event.delay,
            message: event.cause.to_string(),
        });
    }
}
