//! Logging macros
//!
//! Thin wrappers over the tracing crate so call sites across the
//! workspace stay uniform and the subscriber wiring lives in one place
//! (the server binary installs tracing-subscriber).

/// Cross-module logging with a clean API
pub mod logging {

    /// Info level logging - general information messages
    #[macro_export]
    macro_rules! log_info {
        ($($arg:tt)*) => {{
            tracing::info!($($arg)*);
        }};
    }

    /// Warning level logging - potentially problematic situations
    #[macro_export]
    macro_rules! log_warn {
        ($($arg:tt)*) => {{
            tracing::warn!($($arg)*);
        }};
    }

    /// Error level logging - error conditions
    #[macro_export]
    macro_rules! log_error {
        ($($arg:tt)*) => {{
            tracing::error!($($arg)*);
        }};
    }

    /// Debug level logging - detailed information for debugging
    #[macro_export]
    macro_rules! log_debug {
        ($($arg:tt)*) => {{
            tracing::debug!($($arg)*);
        }};
    }
}
