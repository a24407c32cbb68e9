use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::logger::{
    error::LoggerResult,
    object::{LoggerFilter, LoggerFormat},
};

/// Target prefix of the events emitted by the retry executor and its tracing sink.
pub const ATTEMPT_TARGET: &str = "rebound_core";

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Filter expression (e.g., "info", "rebound_core=debug,info").
    pub filter: LoggerFilter,
    /// Whether to include module/target names in log output.
    pub with_targets: bool,
    /// Whether to use colored output.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            filter: LoggerFilter::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Lets retry attempts through the filter at `level` and above.
    ///
    /// `level` is a filter level name (`trace`, `debug`, `info`, `warn`, `error`); it should be
    /// at least as verbose as the level the retry config reports at.
    pub fn with_attempts(mut self, level: &str) -> LoggerResult<Self> {
        self.filter = self
            .filter
            .with_directive(&format!("{ATTEMPT_TARGET}={level}"))?;
        Ok(self)
    }

    /// Color is used only when enabled and stdout is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}
