//! Logging setup for applications embedding the bus.

use tracing::Level;

/// Installs a `fmt` subscriber that prints events up to `level`, tagged with
/// the emitting thread's name (worker pool threads are named by config).
///
/// Unknown level names mean `info`. If a global subscriber is already set,
/// whether by an earlier call or by the host application, this does nothing.
pub fn init(level: &str) {
    let installed = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(false)
        .with_thread_names(true)
        .try_init();
    if installed.is_err() {
        tracing::trace!("global subscriber already installed");
    }
}

pub(crate) fn parse_level(level: &str) -> Level {
    match level.trim().to_ascii_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" | "warning" => Level::WARN,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    }
}
