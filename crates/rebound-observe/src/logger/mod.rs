mod config;
mod error;
mod install;
mod object;

pub use config::{ATTEMPT_TARGET, LoggerConfig};
pub use error::{LoggerError, LoggerResult};
pub use object::{LoggerFilter, LoggerFormat};

/// Installs the global tracing subscriber described by `cfg`.
///
/// Retry attempts reported through `rebound_core::TracingSink` are ordinary `tracing`
/// events; whether they show up depends on the filter (see [`LoggerConfig::with_attempts`]).
///
/// # Examples
/// ```rust
/// use rebound_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("Failed to initialize logger");
///
/// tracing::info!("Logger initialized successfully");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    match cfg.format {
        LoggerFormat::Text => install::install_text(cfg),
        LoggerFormat::Json => install::install_json(cfg),
    }
}
