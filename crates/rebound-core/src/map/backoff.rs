use std::time::Duration;

use rebound_model::RetrySpec;

use super::{to_jitter, to_level};
use crate::{
    config::RetryConfig,
    error::CoreError,
    sink::{discard_sink, tracing_sink},
};

/// Build a validated [`RetryConfig`] from its declarative form.
///
/// Validation runs here as well, so a bad config file is reported when it is loaded rather
/// than on the first retry session.
pub fn to_retry_config(s: &RetrySpec) -> Result<RetryConfig, CoreError> {
    let cfg = RetryConfig {
        delay: Duration::from_millis(s.delay_ms),
        scale: s.scale.unwrap_or(0.0),
        jitter: to_jitter(s.jitter),
        pre_delay: Duration::from_millis(s.pre_delay_ms),
        max_delay: s.max_delay_ms.map(Duration::from_millis),
        timeout: s.timeout_ms.map(Duration::from_millis),
        sink: if s.log_attempts {
            tracing_sink()
        } else {
            discard_sink()
        },
        level: to_level(s.log_level),
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Parse a JSON retry spec and map it.
pub fn load_retry_config(json: &str) -> Result<RetryConfig, CoreError> {
    to_retry_config(&RetrySpec::from_json(json)?)
}
