use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::logger::LoggerError;

/// Validated `EnvFilter` expression, e.g. `"info"` or `"rebound_core=debug,warn"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoggerFilter(String);

impl LoggerFilter {
    pub fn new(s: impl Into<String>) -> Result<Self, LoggerError> {
        Self::try_from(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends a directive such as `rebound_core=debug`.
    pub fn with_directive(&self, directive: &str) -> Result<Self, LoggerError> {
        if self.0.is_empty() {
            Self::new(directive)
        } else {
            Self::new(format!("{},{}", self.0, directive))
        }
    }

    pub fn to_env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.as_str()).expect("LoggerFilter is always valid after construction")
    }
}

impl Default for LoggerFilter {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl FromStr for LoggerFilter {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LoggerFilter {
    type Error = LoggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        EnvFilter::try_new(&s)
            .map(|_| LoggerFilter(s.clone()))
            .map_err(|e| LoggerError::InvalidFilter(format!("{s}: {e}")))
    }
}

impl From<LoggerFilter> for String {
    fn from(f: LoggerFilter) -> Self {
        f.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_filters() {
        for f in ["info", "trace", "rebound_core=debug,info", "flaky_probe=trace"] {
            assert!(LoggerFilter::new(f).is_ok(), "expected {f} to be valid");
        }
    }

    #[test]
    fn rejects_invalid_filters() {
        for f in ["rebound_core=loud", "a=trace,b=wat"] {
            assert!(
                matches!(f.parse::<LoggerFilter>(), Err(LoggerError::InvalidFilter(_))),
                "expected {f} to be rejected"
            );
        }
    }

    #[test]
    fn with_directive_appends() {
        let f = LoggerFilter::default()
            .with_directive("rebound_core=debug")
            .unwrap();
        assert_eq!(f.as_str(), "info,rebound_core=debug");
        let _ = f.to_env_filter();

        assert!(LoggerFilter::default().with_directive("x=nope").is_err());
    }

    #[test]
    fn serde_rejects_invalid_filter() {
        let ok: LoggerFilter = serde_json::from_str(r#""warn""#).unwrap();
        assert_eq!(ok.as_str(), "warn");
        assert!(serde_json::from_str::<LoggerFilter>(r#""x=nope""#).is_err());
    }
}
