//! Probes a simulated flaky service until it answers.
//!
//! Usage: `flaky-probe [retry-spec.json]`. Ctrl-C cancels the session.
use std::{
    sync::atomic::{AtomicU32, Ordering},
    time::Duration,
};

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use rebound_core::{
    BoxError, ExecScope, ResultExt, RetryExecutor, map::to_retry_config, restartable,
};
use rebound_model::RetrySpec;
use rebound_observe::{LoggerConfig, init_logger};

const DEFAULT_SPEC: &str = r#"{
    "delayMs": 200,
    "scale": 2.0,
    "maxDelayMs": 2000,
    "timeoutMs": 10000,
    "logAttempts": true,
    "logLevel": "info"
}"#;

#[derive(Debug, Error)]
enum ProbeError {
    #[error("service unavailable (call {0})")]
    Unavailable(u32),
    #[error("session expired")]
    SessionExpired,
}

/// Fails a few times, expires its session once, then answers.
struct FlakyService {
    calls: AtomicU32,
}

impl FlakyService {
    async fn probe(&self, scope: &ExecScope) -> Result<String, ProbeError> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        tokio::time::sleep(Duration::from_millis(50)).await;
        match n {
            1..=3 | 5 => Err(ProbeError::Unavailable(n)),
            4 => Err(ProbeError::SessionExpired),
            _ => Ok(format!("pong after {n} calls, deadline {:?}", scope.deadline())),
        }
    }
}

async fn attempt(service: &FlakyService, scope: ExecScope) -> Result<String, BoxError> {
    let res = scope.run_until_done(service.probe(&scope)).await?;
    match res {
        Err(e @ ProbeError::SessionExpired) => Err(restartable(e).into()),
        other => Ok(other.retriable()?),
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    init_logger(&LoggerConfig::default().with_attempts("info")?)?;

    let spec = match std::env::args().nth(1) {
        Some(path) => RetrySpec::from_json(&std::fs::read_to_string(path)?)?,
        None => RetrySpec::from_json(DEFAULT_SPEC)?,
    };
    let cfg = to_retry_config(&spec)?;
    info!(?cfg, "retry config loaded");

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling");
            on_signal.cancel();
        }
    });

    let service = FlakyService {
        calls: AtomicU32::new(0),
    };
    let answer = RetryExecutor::new()
        .run1(&cancel, &cfg, |scope| attempt(&service, scope))
        .await?;

    info!(%answer, "probe succeeded");
    Ok(())
}
