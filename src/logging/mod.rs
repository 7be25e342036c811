//! Logging and observability
//!
//! Structured logging with `tracing`:
//! - human-readable console output on stderr
//! - optional JSON file output with rotation
//! - log level from configuration, overridable with `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use medicode::logging::init_logging;
//! use medicode::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a completed patient fetch
///
/// # Example
///
/// ```no_run
/// use medicode::log_fetch_complete;
/// use std::time::Duration;
///
/// log_fetch_complete!(12, Duration::from_millis(250));
/// ```
#[macro_export]
macro_rules! log_fetch_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Patients fetched"
        );
    };
}

/// Log a confirmed review decision
///
/// # Example
///
/// ```no_run
/// use medicode::log_status_transition;
/// use medicode::domain::ValidationStatus;
///
/// log_status_transition!(
///     "dx-1",
///     ValidationStatus::Pending,
///     ValidationStatus::Approved,
///     "Dr. Evelyn Reed"
/// );
/// ```
#[macro_export]
macro_rules! log_status_transition {
    ($entry_id:expr, $from:expr, $to:expr, $reviewer:expr) => {
        tracing::info!(
            entry_id = %$entry_id,
            from = %$from,
            to = %$to,
            reviewer = %$reviewer,
            "Code status updated"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use medicode::log_error_with_context;
/// use medicode::domain::MedicodeError;
///
/// let error = MedicodeError::Configuration("Invalid config".to_string());
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
