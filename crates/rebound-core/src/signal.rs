//! Retry and restart markers.
//!
//! An operation asks for another attempt by returning an error that contains a [`Signal`]
//! somewhere in its `source()` chain. Intermediate layers are free to wrap the signal in their
//! own error types; [`classify`] walks the whole chain.
use std::{error::Error, fmt, iter};

/// Boxed error returned by operations.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Which kind of repetition a [`Signal`] requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// Try again, keeping the current delay and deadline.
    Retry,
    /// Try again from scratch: delay back to base, deadline restarted.
    Restart,
}

impl SignalKind {
    /// Return label value for logs.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            SignalKind::Retry => "retry",
            SignalKind::Restart => "restart",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Error marker requesting another attempt.
///
/// Displays as its cause, and exposes the cause as `source()`.
#[derive(Debug)]
pub struct Signal {
    kind: SignalKind,
    cause: BoxError,
}

impl Signal {
    pub fn new(kind: SignalKind, cause: impl Into<BoxError>) -> Self {
        Self {
            kind,
            cause: cause.into(),
        }
    }

    /// Marks `cause` as retriable.
    pub fn retry(cause: impl Into<BoxError>) -> Self {
        Self::new(SignalKind::Retry, cause)
    }

    /// Marks `cause` as requiring a restart.
    pub fn restart(cause: impl Into<BoxError>) -> Self {
        Self::new(SignalKind::Restart, cause)
    }

    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.cause
    }

    pub fn into_cause(self) -> BoxError {
        self.cause
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.cause, f)
    }
}

impl Error for Signal {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.cause)
    }
}

/// Wraps `err` in a retry signal.
pub fn retriable(err: impl Into<BoxError>) -> Signal {
    Signal::retry(err)
}

/// Wraps `err` in a restart signal.
pub fn restartable(err: impl Into<BoxError>) -> Signal {
    Signal::restart(err)
}

/// Like [`retriable`], but `None` stays `None`.
pub fn retriable_opt<E: Into<BoxError>>(err: Option<E>) -> Option<Signal> {
    err.map(Signal::retry)
}

/// Like [`restartable`], but `None` stays `None`.
pub fn restartable_opt<E: Into<BoxError>>(err: Option<E>) -> Option<Signal> {
    err.map(Signal::restart)
}

/// Tagging helpers on `Result`: the error side is wrapped, `Ok` passes through.
///
/// ```
/// use rebound_core::{BoxError, ResultExt};
///
/// fn read() -> Result<u8, std::io::Error> {
///     Ok(7)
/// }
///
/// fn attempt() -> Result<u8, BoxError> {
///     Ok(read().retriable()?)
/// }
///
/// assert_eq!(attempt().unwrap(), 7);
/// ```
pub trait ResultExt<T> {
    fn retriable(self) -> Result<T, Signal>;
    fn restartable(self) -> Result<T, Signal>;
}

impl<T, E: Into<BoxError>> ResultExt<T> for Result<T, E> {
    fn retriable(self) -> Result<T, Signal> {
        self.map_err(Signal::retry)
    }

    fn restartable(self) -> Result<T, Signal> {
        self.map_err(Signal::restart)
    }
}

/// Classification of an operation error.
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    /// No marker: the error ends the session.
    Terminal,
    Retry(&'a Signal),
    Restart(&'a Signal),
}

impl Outcome<'_> {
    pub fn kind(&self) -> Option<SignalKind> {
        match self {
            Outcome::Terminal => None,
            Outcome::Retry(_) => Some(SignalKind::Retry),
            Outcome::Restart(_) => Some(SignalKind::Restart),
        }
    }
}

/// Classify `err` by searching its whole source chain for a [`Signal`].
///
/// A restart marker anywhere in the chain wins over retry markers.
pub fn classify<'a>(err: &'a (dyn Error + 'static)) -> Outcome<'a> {
    let mut retry = None;
    for signal in chain(err).filter_map(|e| e.downcast_ref::<Signal>()) {
        match signal.kind {
            SignalKind::Restart => return Outcome::Restart(signal),
            SignalKind::Retry => {
                retry.get_or_insert(signal);
            }
        }
    }
    retry.map_or(Outcome::Terminal, Outcome::Retry)
}

/// Iterate over `err` and its sources, outermost first.
pub(crate) fn chain<'a>(
    err: &'a (dyn Error + 'static),
) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
    iter::successors(Some(err), |e| (*e).source())
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("while syncing: {0}")]
    struct Syncing(#[source] Signal);

    #[derive(Debug, Error)]
    #[error("job failed")]
    struct Job(#[source] Syncing);

    #[test]
    fn plain_error_is_terminal() {
        let err = std::io::Error::other("boom");
        assert!(matches!(classify(&err), Outcome::Terminal));
    }

    #[test]
    fn bare_signals_are_classified() {
        let retry = Signal::retry("again");
        let restart = Signal::restart("from scratch");
        assert_eq!(classify(&retry).kind(), Some(SignalKind::Retry));
        assert_eq!(classify(&restart).kind(), Some(SignalKind::Restart));
    }

    #[test]
    fn classification_sees_through_wrapping() {
        let err = Job(Syncing(Signal::restart("connection reset")));
        match classify(&err) {
            Outcome::Restart(signal) => assert_eq!(signal.to_string(), "connection reset"),
            other => panic!("expected restart, got {other:?}"),
        }
    }

    #[test]
    fn restart_wins_over_outer_retry() {
        let inner = Syncing(Signal::restart("stale session"));
        let err = Signal::retry(inner);
        assert_eq!(classify(&err).kind(), Some(SignalKind::Restart));
    }

    #[test]
    fn signal_displays_as_cause_and_exposes_it_as_source() {
        let err = Signal::retry(std::io::Error::other("timed out"));
        assert_eq!(err.to_string(), "timed out");
        assert_eq!(err.source().unwrap().to_string(), "timed out");
        assert_eq!(err.cause().to_string(), "timed out");
        assert_eq!(err.into_cause().to_string(), "timed out");
    }

    #[test]
    fn none_cause_yields_none() {
        assert!(retriable_opt(None::<std::io::Error>).is_none());
        assert!(restartable_opt(None::<&str>).is_none());
        assert_eq!(
            retriable_opt(Some("x")).map(|s| s.kind()),
            Some(SignalKind::Retry)
        );
    }

    #[test]
    fn result_ext_leaves_ok_untouched() {
        let ok: Result<u8, std::io::Error> = Ok(1);
        assert_eq!(ok.retriable().unwrap(), 1);

        let err: Result<u8, &str> = Err("flaky");
        let signal = err.restartable().unwrap_err();
        assert_eq!(signal.kind(), SignalKind::Restart);
        assert_eq!(restartable("y").kind(), SignalKind::Restart);
        assert_eq!(retriable("y").kind(), SignalKind::Retry);
    }

    #[test]
    fn boxed_signal_is_still_found() {
        let err: BoxError = Box::new(Job(Syncing(Signal::retry("again"))));
        assert_eq!(classify(&*err).kind(), Some(SignalKind::Retry));
    }

    #[test]
    fn chain_walks_every_source_outermost_first() {
        let err = Job(Syncing(Signal::retry("again")));
        let messages: Vec<String> = chain(&err).map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            ["job failed", "while syncing: again", "again", "again"]
        );
    }
}
