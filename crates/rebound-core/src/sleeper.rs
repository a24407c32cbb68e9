use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

/// Waits for a duration.
///
/// The executor never sleeps directly; every pre-delay and inter-attempt wait goes through a
/// `Sleeper`, and is always raced against the scope of the session.
#[async_trait]
pub trait Sleeper: Send + Sync + 'static {
    async fn sleep(&self, delay: Duration);
}

/// Shared handle to a sleeper.
pub type SleeperHandle = Arc<dyn Sleeper>;

/// Sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn tokio_sleeper_waits_for_the_duration() {
        let start = Instant::now();
        TokioSleeper.sleep(Duration::from_secs(90)).await;
        assert!(start.elapsed() >= Duration::from_secs(90));
    }
}
