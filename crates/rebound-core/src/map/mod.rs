mod backoff;
mod jitter;
mod level;

pub use backoff::{load_retry_config, to_retry_config};
pub use jitter::to_jitter;
pub use level::to_level;
