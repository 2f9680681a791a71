//! Domain models and types for Invex.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Validated inputs** ([`SegmentCode`], [`ExtractionDate`])
//! - **Row models** ([`RawRow`], [`ExportRecord`], [`Scalar`])
//! - **Error types** ([`InvexError`], [`PipelineStep`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, InvexError>`]:
//!
//! ```rust
//! use invex::domain::{ExtractionDate, InvexError, Result};
//!
//! fn parse(raw: &str) -> Result<ExtractionDate> {
//!     ExtractionDate::parse(raw).map_err(InvexError::Validation)
//! }
//!
//! assert!(parse("20240131").is_ok());
//! assert!(parse("31/01/2024").is_err());
//! ```

pub mod errors;
pub mod ids;
pub mod invoice;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{InvexError, PipelineStep};
pub use ids::{ExtractionDate, SegmentCode};
pub use invoice::{ExportRecord, RawRow, Scalar, COLUMN_COUNT, EXPORT_COLUMNS, TRAILER_MARKER};
pub use result::Result;
