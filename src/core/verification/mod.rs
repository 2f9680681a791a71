//! Export file verification
//!
//! This module re-reads a written C0401 file and checks the properties the
//! downstream ingester relies on: the fixed header row, uniform row width and
//! the `Finish` trailer that marks a complete file.

pub mod checksum;
pub mod report;
pub mod verify;

pub use checksum::{calculate_checksum_bytes, calculate_file_checksum};
pub use report::{ExportFileReport, VerificationIssue};
pub use verify::verify_export_file;
