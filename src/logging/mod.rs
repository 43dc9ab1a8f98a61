//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - JSON-formatted local file logging with rotation
//!
//! Detected values never reach the logs. Macros in this module record kinds
//! and counts only.
//!
//! # Example
//!
//! ```no_run
//! use vigil::logging::init_logging;
//! use vigil::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Service started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a moderation verdict without its entity values
///
/// # Example
///
/// ```no_run
/// use vigil::log_verdict;
/// use vigil::moderation::ModerationPolicy;
///
/// let verdict = ModerationPolicy::default().decide(vec![], 0.02);
/// log_verdict!("req-1", "ru", verdict, 12u64);
/// ```
#[macro_export]
macro_rules! log_verdict {
    ($request_id:expr, $lang:expr, $verdict:expr, $duration_ms:expr) => {
        tracing::info!(
            request_id = %$request_id,
            lang = %$lang,
            flagged = $verdict.flagged(),
            reason = $verdict.reason().as_str(),
            entity_count = $verdict.entities().len(),
            toxicity_score = $verdict.toxicity_score(),
            duration_ms = $duration_ms,
            "Moderation verdict"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use vigil::log_error_with_context;
/// use vigil::domain::VigilError;
///
/// let error = VigilError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
