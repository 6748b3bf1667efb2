//! Progress logging filtered by the configured `LogLevel`.

use tracing::level_filters::LevelFilter;
use tracing::Subscriber;

use crate::config::LogLevel;

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Quiet => LevelFilter::OFF,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
        }
    }
}

/// Subscriber writing ` INFO message` style lines (no time, no target) to
/// stderr, up to `level`.
pub fn subscriber(level: LogLevel) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::from(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish()
}

/// Run `f` with logging scoped to `level`.
pub fn with_level<T>(level: LogLevel, f: impl FnOnce() -> T) -> T {
    tracing::subscriber::with_default(subscriber(level), f)
}
