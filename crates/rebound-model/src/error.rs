use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown jitter mode: {0}")]
    UnknownJitter(String),

    #[error("unknown attempt level: {0}")]
    UnknownLevel(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
