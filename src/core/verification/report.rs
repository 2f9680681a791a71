//! Verification report structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of verifying one export file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportFileReport {
    /// File that was verified
    pub path: PathBuf,

    /// When the verification was performed
    pub verified_at: DateTime<Utc>,

    /// First line matches the fixed column header
    pub header_valid: bool,

    /// Last line is the `Finish` trailer
    pub trailer_present: bool,

    /// Lines between header and trailer
    pub data_rows: usize,

    /// Data rows with at least one invoice header column populated
    pub rows_with_header_fields: usize,

    /// SHA-256 of the file contents
    pub checksum: String,

    /// Problems found, empty for a valid file
    pub issues: Vec<VerificationIssue>,
}

/// A single problem found in an export file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationIssue {
    /// One-based line number, if the problem is tied to a line
    pub line: Option<usize>,

    /// Description of the problem
    pub reason: String,
}

impl VerificationIssue {
    /// Issue tied to a line
    pub fn at_line(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            reason: reason.into(),
        }
    }

    /// Issue about the file as a whole
    pub fn file(reason: impl Into<String>) -> Self {
        Self {
            line: None,
            reason: reason.into(),
        }
    }
}

impl ExportFileReport {
    /// Create an empty report for a file
    pub fn new(path: impl Into<PathBuf>, checksum: String) -> Self {
        Self {
            path: path.into(),
            verified_at: Utc::now(),
            header_valid: false,
            trailer_present: false,
            data_rows: 0,
            rows_with_header_fields: 0,
            checksum,
            issues: Vec::new(),
        }
    }

    /// Record a problem
    pub fn add_issue(&mut self, issue: VerificationIssue) {
        self.issues.push(issue);
    }

    /// True if the file is safe to hand to the ingester
    pub fn is_valid(&self) -> bool {
        self.header_valid && self.trailer_present && self.issues.is_empty()
    }

    /// A file without the trailer was cut short while being written
    pub fn is_truncated(&self) -> bool {
        !self.trailer_present
    }
}
