//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn, LevelFilter};

/// Initialize the logging system from `RUST_LOG` (defaults to `info`)
pub fn init() {
    init_with_level(LevelFilter::Info);
}

/// Initialize logging with a fallback level used when `RUST_LOG` is unset.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_level(level: LevelFilter) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.as_str()),
    );
    builder.format_timestamp_millis();
    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}
