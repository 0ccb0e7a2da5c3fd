use log::{info, log_enabled, warn, Level};

/// Initializes the logger with the `env_logger` crate.
///
/// Verbosity is controlled through `RUST_LOG`, e.g. `RUST_LOG=otodata_rs=debug`.
pub fn init_logger() {
    env_logger::init();
}

/// Initializes the logger, tolerating an already-installed logger.
///
/// Useful for tests and embedding hosts that may have set one up.
pub fn try_init_logger() -> Result<(), log::SetLoggerError> {
    env_logger::try_init()
}

/// Logs a warning message.
pub fn log_warn(message: &str) {
    if log_enabled!(Level::Warn) {
        warn!("{message}");
    }
}

/// Logs an informational message.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}
