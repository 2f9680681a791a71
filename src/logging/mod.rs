//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output
//! - JSON-formatted rolling log files
//! - Configurable log levels
//!
//! # Example
//!
//! ```no_run
//! use invex::logging::init_logging;
//! use invex::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(segment = "LP", "Extraction started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of an extraction run
///
/// # Example
///
/// ```no_run
/// use invex::log_extraction_start;
/// use invex::domain::{ExtractionDate, SegmentCode};
///
/// let segment = SegmentCode::new("LP").unwrap();
/// let date = ExtractionDate::parse("20240131").unwrap();
/// log_extraction_start!(&segment, &date);
/// ```
#[macro_export]
macro_rules! log_extraction_start {
    ($segment:expr, $date:expr) => {
        tracing::info!(
            segment = %$segment,
            date = %$date,
            "Starting extraction"
        );
    };
}

/// Log the completion of an extraction run
///
/// # Example
///
/// ```no_run
/// use invex::log_extraction_complete;
/// use std::time::Duration;
///
/// log_extraction_complete!(12, 40, Duration::from_millis(850));
/// ```
#[macro_export]
macro_rules! log_extraction_complete {
    ($invoices:expr, $rows:expr, $duration:expr) => {
        tracing::info!(
            invoice_count = $invoices,
            total_rows = $rows,
            duration_ms = $duration.as_millis() as u64,
            "Extraction completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use invex::log_error_with_context;
/// use invex::domain::InvexError;
///
/// let error = InvexError::Configuration("Invalid config".to_string());
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
