use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Invalid log format: {0} (expected: text|json)")]
    InvalidFormat(String),

    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Logger already initialized")]
    AlreadyInitialized,
}

pub type LoggerResult<T> = Result<T, LoggerError>;
