//! Domain error types
//!
//! This module defines the error hierarchy for Invex.
//! All errors are domain-specific and don't expose third-party types.

use std::fmt;
use thiserror::Error;

/// Pipeline step an error originated from
///
/// Every failure of an extraction run is attributed to exactly one step so the
/// caller can tell a half-prepared session from a failed file write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    /// Input validation before any database call
    Validation,
    /// Acquiring the database session
    Connection,
    /// Segment context procedure
    SetSegment,
    /// Report materialization procedure
    MaterializeReport,
    /// Extraction query
    Query,
    /// Decoding or mapping a result row
    RowScan,
    /// Writing the export file
    FileWrite,
}

impl PipelineStep {
    /// Returns the step name used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStep::Validation => "validation",
            PipelineStep::Connection => "connection",
            PipelineStep::SetSegment => "procedure-set-segment",
            PipelineStep::MaterializeReport => "procedure-materialize-report",
            PipelineStep::Query => "query",
            PipelineStep::RowScan => "row-scan",
            PipelineStep::FileWrite => "file-write",
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main Invex error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum InvexError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid caller input (segment or date)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Failed to acquire a database session
    #[error("Connection error: {0}")]
    Connection(String),

    /// One of the two preparation procedures failed
    #[error("Procedure error ({step}): {message}")]
    Procedure {
        /// Which preparation procedure failed
        step: PipelineStep,
        /// Underlying failure
        message: String,
    },

    /// Extraction query failed
    #[error("Query error: {0}")]
    Query(String),

    /// A result row could not be decoded or mapped
    #[error("Row scan error at row {row}: {message}")]
    RowScan {
        /// Zero-based index of the offending row
        row: usize,
        /// Underlying failure
        message: String,
    },

    /// Directory or file create/write failure
    #[error("Filesystem error at {path}: {message}")]
    Filesystem {
        /// Path being created or written
        path: String,
        /// Underlying failure
        message: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors outside of the export file path
    #[error("I/O error: {0}")]
    Io(String),
}

impl InvexError {
    /// Builds a procedure error for the given preparation step
    pub fn procedure(step: PipelineStep, message: impl Into<String>) -> Self {
        InvexError::Procedure {
            step,
            message: message.into(),
        }
    }

    /// Builds a row scan error for the given row index
    pub fn row_scan(row: usize, message: impl Into<String>) -> Self {
        InvexError::RowScan {
            row,
            message: message.into(),
        }
    }

    /// Builds a filesystem error for the given path
    pub fn filesystem(path: impl AsRef<std::path::Path>, message: impl fmt::Display) -> Self {
        InvexError::Filesystem {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    /// Returns the pipeline step this error belongs to, if any
    ///
    /// Ambient errors (configuration, serialization, generic I/O) are not
    /// attributed to a pipeline step.
    pub fn step(&self) -> Option<PipelineStep> {
        match self {
            InvexError::Validation(_) => Some(PipelineStep::Validation),
            InvexError::Connection(_) => Some(PipelineStep::Connection),
            InvexError::Procedure { step, .. } => Some(*step),
            InvexError::Query(_) => Some(PipelineStep::Query),
            InvexError::RowScan { .. } => Some(PipelineStep::RowScan),
            InvexError::Filesystem { .. } => Some(PipelineStep::FileWrite),
            InvexError::Configuration(_) | InvexError::Serialization(_) | InvexError::Io(_) => {
                None
            }
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for InvexError {
    fn from(err: std::io::Error) -> Self {
        InvexError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for InvexError {
    fn from(err: serde_json::Error) -> Self {
        InvexError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for InvexError {
    fn from(err: toml::de::Error) -> Self {
        InvexError::Configuration(format!("TOML parse error: {err}"))
    }
}
