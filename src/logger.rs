//! Centralized logging configuration for apex-rotations binaries and benchmarks
//!
//! The library itself only emits `tracing` events. Executables call one of the
//! functions below once at startup to install a subscriber.

use tracing::Level;

/// Initialize the tracing subscriber with the default INFO level
///
/// The level can be overridden through the `RUST_LOG` environment variable.
///
/// # Example
/// ```no_run
/// use apex_rotations::init_logger;
///
/// init_logger();
/// tracing::info!("Application started");
/// ```
///
/// # Environment Variables
/// ```bash
/// RUST_LOG=debug cargo run --bin roundtrip_report
/// RUST_LOG=apex_rotations=trace cargo run --bin roundtrip_report
/// ```
pub fn init_logger() {
    init_logger_with_level(Level::INFO)
}

/// Initialize the tracing subscriber with a custom default level
///
/// # Arguments
/// * `default_level` - The default log level (overrideable via RUST_LOG)
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn init_logger_with_level(default_level: Level) {
    use tracing_subscriber::fmt::time::SystemTime;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        // [LEVEL: date:time module]
        .with_timer(SystemTime)
        .with_target(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_twice_does_not_panic() {
        init_logger_with_level(Level::WARN);
        init_logger();
        tracing::debug!("logger initialised");
    }
}
