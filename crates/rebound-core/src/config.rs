use std::{fmt, time::Duration};

use tracing::Level;

use crate::error::ConfigError;
use crate::sink::{SinkHandle, discard_sink};

/// Jitter value that disables jitter.
pub const NO_JITTER: f64 = -1.0;

/// Jitter applied when none is configured.
pub const DEFAULT_JITTER: f64 = 0.125;

/// Effective cap when no maximum delay is configured.
pub const UNBOUNDED: Duration = Duration::from_nanos(u64::MAX);

/// Retry session configuration.
///
/// Zero values mean "unset" and are replaced by defaults when the session starts:
/// - `scale`: 1 (constant delay), must not be below 1 otherwise;
/// - `jitter`: [`DEFAULT_JITTER`], must be within `[0,1]`; use [`NO_JITTER`] to disable;
/// - `max_delay`: unbounded;
/// - `timeout`: none.
///
/// `delay` is required.
#[derive(Clone)]
pub struct RetryConfig {
    /// Delay between attempts, scaled by `scale` after every retry until it reaches `max_delay`.
    pub delay: Duration,
    /// Exponential scale for the delay.
    pub scale: f64,
    /// Fraction of random spread applied to each delay.
    pub jitter: f64,
    /// Wait before the first attempt.
    pub pre_delay: Duration,
    /// Cap on delay scaling.
    pub max_delay: Option<Duration>,
    /// Maximum total time to retry.
    ///
    /// When reached, the scope passed to the operation is done and no further attempt is
    /// made. Operations have to watch their scope to be aborted promptly.
    /// Restart signals start a fresh timeout.
    pub timeout: Option<Duration>,
    /// Receives retried attempts. Identical subsequent causes are reported once.
    pub sink: SinkHandle,
    /// Level passed along with every reported attempt.
    pub level: Level,
}

impl RetryConfig {
    /// Create a config with the given base delay and defaults for everything else.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn without_jitter(self) -> Self {
        self.with_jitter(NO_JITTER)
    }

    pub fn with_pre_delay(mut self, pre_delay: Duration) -> Self {
        self.pre_delay = pre_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_sink(mut self, sink: SinkHandle) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Check the configuration and resolve defaults.
    ///
    /// Rules:
    /// - `delay` is non-zero;
    /// - `scale` is 0 (unset) or at least 1;
    /// - `jitter` is [`NO_JITTER`], 0 (unset) or within `[0,1]`.
    pub fn validate(&self) -> Result<Backoff, ConfigError> {
        if self.delay.is_zero() {
            return Err(ConfigError::MissingDelay);
        }

        let scale = if self.scale == 0.0 { 1.0 } else { self.scale };
        if !(scale >= 1.0) {
            return Err(ConfigError::InvalidScale(self.scale));
        }

        let jitter = if self.jitter == NO_JITTER {
            0.0
        } else if self.jitter == 0.0 {
            DEFAULT_JITTER
        } else {
            self.jitter
        };
        if !(0.0..=1.0).contains(&jitter) {
            return Err(ConfigError::InvalidJitter(self.jitter));
        }

        Ok(Backoff {
            delay: self.delay,
            scale,
            jitter,
            pre_delay: self.pre_delay,
            max_delay: self.max_delay.filter(|d| !d.is_zero()).unwrap_or(UNBOUNDED),
            timeout: self.timeout.filter(|t| !t.is_zero()),
        })
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            scale: 0.0,
            jitter: 0.0,
            pre_delay: Duration::ZERO,
            max_delay: None,
            timeout: None,
            sink: discard_sink(),
            level: Level::DEBUG,
        }
    }
}

impl fmt::Debug for RetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("delay", &self.delay)
            .field("scale", &self.scale)
            .field("jitter", &self.jitter)
            .field("pre_delay", &self.pre_delay)
            .field("max_delay", &self.max_delay)
            .field("timeout", &self.timeout)
            .field("sink", &"<handle>")
            .field("level", &self.level)
            .finish()
    }
}

/// Validated, immutable delay policy for one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    delay: Duration,
    scale: f64,
    jitter: f64,
    pre_delay: Duration,
    max_delay: Duration,
    timeout: Option<Duration>,
}

impl Backoff {
    /// Base delay, also the delay right after a restart.
    pub fn base(&self) -> Duration {
        self.delay
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Effective jitter fraction, 0 when disabled.
    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    pub fn pre_delay(&self) -> Duration {
        self.pre_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Spread `delay` by the jitter fraction.
    ///
    /// `unit` is a random number in `[0,1)`; the result lies in
    /// `[delay * (1 - jitter), delay * (1 + jitter)]`.
    pub fn jittered(&self, delay: Duration, unit: f64) -> Duration {
        mul(delay, 1.0 + 2.0 * unit * self.jitter - self.jitter)
    }

    /// Delay for the attempt after one waited `delay`.
    pub fn next_delay(&self, delay: Duration) -> Duration {
        mul(delay, self.scale).min(self.max_delay)
    }
}

/// Saturating multiplication in nanoseconds.
fn mul(d: Duration, factor: f64) -> Duration {
    Duration::from_nanos((d.as_nanos() as f64 * factor) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: Duration = Duration::from_secs(1);

    #[test]
    fn zero_delay_is_rejected() {
        let err = RetryConfig::default().validate().unwrap_err();
        assert_eq!(err, ConfigError::MissingDelay);
    }

    #[test]
    fn invalid_scales_are_rejected() {
        for scale in [0.9, -0.1, f64::NAN] {
            let err = RetryConfig::new(S).with_scale(scale).validate().unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidScale(_)),
                "scale {scale} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn invalid_jitters_are_rejected() {
        for jitter in [-0.1, 1.1, f64::NAN] {
            let err = RetryConfig::new(S).with_jitter(jitter).validate().unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidJitter(_)),
                "jitter {jitter} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn unset_values_resolve_to_defaults() {
        let b = RetryConfig::new(S).validate().unwrap();
        assert_eq!(b.base(), S);
        assert_eq!(b.scale(), 1.0);
        assert_eq!(b.jitter(), DEFAULT_JITTER);
        assert_eq!(b.pre_delay(), Duration::ZERO);
        assert_eq!(b.max_delay(), UNBOUNDED);
        assert_eq!(b.timeout(), None);
    }

    #[test]
    fn zero_durations_mean_unbounded() {
        let b = RetryConfig::new(S)
            .with_max_delay(Duration::ZERO)
            .with_timeout(Duration::ZERO)
            .validate()
            .unwrap();
        assert_eq!(b.max_delay(), UNBOUNDED);
        assert_eq!(b.timeout(), None);
    }

    #[test]
    fn no_jitter_sentinel_disables_jitter() {
        let b = RetryConfig::new(S).without_jitter().validate().unwrap();
        assert_eq!(b.jitter(), 0.0);
        assert_eq!(b.jittered(S, 0.0), S);
        assert_eq!(b.jittered(S, 0.999), S);
    }

    #[test]
    fn jitter_bounds() {
        let b = RetryConfig::new(S).with_jitter(0.5).validate().unwrap();
        assert_eq!(b.jittered(S, 0.0), Duration::from_millis(500));
        assert_eq!(b.jittered(S, 0.5), S);
        assert!(b.jittered(S, 0.999_999) <= Duration::from_millis(1500));
    }

    #[test]
    fn delays_scale_and_cap() {
        let b = RetryConfig::new(2 * S)
            .with_scale(2.0)
            .with_max_delay(10 * S)
            .validate()
            .unwrap();

        let mut delay = b.base();
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(delay);
            delay = b.next_delay(delay);
        }
        assert_eq!(seen, [2 * S, 4 * S, 8 * S, 10 * S, 10 * S]);
    }

    #[test]
    fn unbounded_growth_saturates_instead_of_panicking() {
        let b = RetryConfig::new(Duration::from_secs(u64::MAX / 2))
            .with_scale(1e6)
            .validate()
            .unwrap();
        assert_eq!(b.next_delay(b.base()), UNBOUNDED);
    }

    #[test]
    fn validation_does_not_touch_caller_config() {
        let cfg = RetryConfig::new(S);
        let _ = cfg.validate().unwrap();
        assert_eq!(cfg.scale, 0.0);
        assert_eq!(cfg.jitter, 0.0);
    }
}
