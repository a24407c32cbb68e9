use serde::{Deserialize, Serialize};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use super::{AttemptLevel, JitterMode};
use crate::error::{ModelError, ModelResult};

/// Declarative retry policy, as it appears in configuration files.
///
/// All durations are milliseconds. Optional fields fall back to the executor defaults:
/// no scaling, default jitter, no pre-delay, unbounded delay, no timeout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct RetrySpec {
    /// Delay before the first retry. Required, must be non-zero.
    pub delay_ms: u64,
    /// Multiplier applied to the delay after every retry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default)]
    pub jitter: JitterMode,
    /// Wait before the very first attempt.
    #[serde(default)]
    pub pre_delay_ms: u64,
    /// Cap for the scaled delay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delay_ms: Option<u64>,
    /// Deadline for the whole session, restarted by restart signals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Report retried attempts through `tracing`.
    #[serde(default)]
    pub log_attempts: bool,
    #[serde(default)]
    pub log_level: AttemptLevel,
}

impl RetrySpec {
    /// Spec with the given base delay and everything else defaulted.
    pub fn with_delay_ms(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            scale: None,
            jitter: JitterMode::Default,
            pre_delay_ms: 0,
            max_delay_ms: None,
            timeout_ms: None,
            log_attempts: false,
            log_level: AttemptLevel::Debug,
        }
    }

    /// Parse a spec from a JSON document.
    pub fn from_json(s: &str) -> ModelResult<Self> {
        serde_json::from_str(s).map_err(|e| ModelError::Invalid(e.to_string()))
    }
}
