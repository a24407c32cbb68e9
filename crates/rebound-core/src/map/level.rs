use rebound_model::AttemptLevel;
use tracing::Level;

pub fn to_level(l: AttemptLevel) -> Level {
    match l {
        AttemptLevel::Trace => Level::TRACE,
        AttemptLevel::Debug => Level::DEBUG,
        AttemptLevel::Info => Level::INFO,
        AttemptLevel::Warn => Level::WARN,
        AttemptLevel::Error => Level::ERROR,
    }
}
