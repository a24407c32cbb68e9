mod backoff;
pub use backoff::RetrySpec;

mod jitter;
pub use jitter::JitterMode;

mod level;
pub use level::AttemptLevel;
