use rebound_model::JitterMode;

use crate::config::NO_JITTER;

/// Jitter value understood by [`crate::RetryConfig`].
///
/// An explicit zero fraction in a config file means "no jitter", not "default".
pub fn to_jitter(mode: JitterMode) -> f64 {
    match mode {
        JitterMode::Default => 0.0,
        JitterMode::Disabled => NO_JITTER,
        JitterMode::Fraction(f) if f == 0.0 => NO_JITTER,
        JitterMode::Fraction(f) => f,
    }
}
