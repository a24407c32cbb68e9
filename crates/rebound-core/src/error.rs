use thiserror::Error;

use rebound_model::ModelError;

use crate::signal::{BoxError, chain};

/// Configuration rejected before the first attempt.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("no delay is specified")]
    MissingDelay,

    #[error("scale can't be less than 1: {0}")]
    InvalidScale(f64),

    #[error("jitter has to be within [0,1]: {0}")]
    InvalidJitter(f64),
}

/// Why an execution scope stopped being valid.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScopeError {
    #[error("operation was cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Final result of a retry session.
#[derive(Debug, Error)]
pub enum RetryError {
    #[error("invalid retry config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    /// Terminal error returned by the operation, unchanged.
    #[error(transparent)]
    Operation(BoxError),
}

impl RetryError {
    /// Scope error behind this result, looking through operation errors as well.
    pub fn scope_error(&self) -> Option<ScopeError> {
        match self {
            RetryError::Scope(e) => Some(*e),
            RetryError::Operation(e) => {
                chain(&**e).find_map(|cause| cause.downcast_ref::<ScopeError>().copied())
            }
            RetryError::Config(_) => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.scope_error() == Some(ScopeError::Cancelled)
    }

    pub fn is_deadline_exceeded(&self) -> bool {
        self.scope_error() == Some(ScopeError::DeadlineExceeded)
    }

    /// Unwraps the terminal operation error, if that is what ended the session.
    pub fn into_operation(self) -> Option<BoxError> {
        match self {
            RetryError::Operation(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("invalid retry config: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("fetch failed")]
    struct FetchFailed(#[source] ScopeError);

    #[test]
    fn scope_variant_reports_kind() {
        let err = RetryError::from(ScopeError::DeadlineExceeded);
        assert!(err.is_deadline_exceeded());
        assert!(!err.is_cancelled());
        assert_eq!(err.to_string(), "deadline exceeded");
    }

    #[test]
    fn operation_error_keeps_scope_kind_through_wrapping() {
        let err = RetryError::Operation(Box::new(FetchFailed(ScopeError::Cancelled)));
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "fetch failed");
    }

    #[test]
    fn plain_operation_error_has_no_scope_kind() {
        let err = RetryError::Operation("disk full".into());
        assert_eq!(err.scope_error(), None);
        assert_eq!(err.into_operation().unwrap().to_string(), "disk full");
    }

    #[test]
    fn config_error_message() {
        let err = RetryError::from(ConfigError::InvalidScale(0.5));
        assert_eq!(err.to_string(), "invalid retry config: scale can't be less than 1: 0.5");
        assert_eq!(err.scope_error(), None);
    }
}
