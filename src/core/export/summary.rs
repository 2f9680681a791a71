//! Extraction summary and reporting
//!
//! This module defines the result of a successful extraction run.

use crate::domain::{ExtractionDate, SegmentCode};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Message returned alongside a successful extraction
pub const SUCCESS_MESSAGE: &str = "CSV generated successfully";

/// Summary of a completed extraction run
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionSummary {
    /// Segment as given by the caller
    segment: String,

    /// Extraction date
    date: ExtractionDate,

    /// Number of invoices (header-bearing rows) written
    invoice_count: usize,

    /// Number of data rows written, header and trailer excluded
    total_rows: usize,

    /// Final path of the export file
    file_path: PathBuf,

    /// SHA-256 of the export file
    checksum: String,

    /// Rows whose buyer name carried supplementary-plane ideographs
    flagged_buyer_names: usize,

    /// Wall-clock duration of the run in milliseconds
    duration_ms: u64,
}

/// Response body for callers that expect the legacy shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResponse {
    pub invoice_count: usize,
    pub total_rows: usize,
    pub file_path: String,
    pub message: String,
}

impl ExtractionSummary {
    /// Create a summary for a run that produced `file_path` with `checksum`
    pub fn new(
        segment: &SegmentCode,
        date: ExtractionDate,
        file_path: PathBuf,
        checksum: impl Into<String>,
    ) -> Self {
        Self {
            segment: segment.as_str().to_string(),
            date,
            invoice_count: 0,
            total_rows: 0,
            file_path,
            checksum: checksum.into(),
            flagged_buyer_names: 0,
            duration_ms: 0,
        }
    }

    /// Set the invoice and data row counts
    pub fn with_counts(mut self, invoice_count: usize, total_rows: usize) -> Self {
        self.invoice_count = invoice_count;
        self.total_rows = total_rows;
        self
    }

    /// Set the number of flagged buyer names
    pub fn with_flagged_buyer_names(mut self, flagged_buyer_names: usize) -> Self {
        self.flagged_buyer_names = flagged_buyer_names;
        self
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Segment as given by the caller
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Extraction date
    pub fn date(&self) -> ExtractionDate {
        self.date
    }

    /// Number of invoices (header-bearing rows) written
    pub fn invoice_count(&self) -> usize {
        self.invoice_count
    }

    /// Number of data rows written, header and trailer excluded
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Final path of the export file
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// SHA-256 of the export file
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// Rows whose buyer name carried supplementary-plane ideographs
    pub fn flagged_buyer_names(&self) -> usize {
        self.flagged_buyer_names
    }

    /// Duration of the run
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Response body with count, rows, path and message
    pub fn to_response(&self) -> ExtractionResponse {
        ExtractionResponse {
            invoice_count: self.invoice_count,
            total_rows: self.total_rows,
            file_path: self.file_path.display().to_string(),
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            segment = %self.segment,
            date = %self.date,
            invoice_count = self.invoice_count,
            total_rows = self.total_rows,
            file = %self.file_path.display(),
            checksum = %self.checksum,
            duration_ms = self.duration_ms,
            "Extraction summary"
        );

        if self.flagged_buyer_names > 0 {
            tracing::warn!(
                flagged_buyer_names = self.flagged_buyer_names,
                "Some buyer names contain rare characters and may not render downstream"
            );
        }
    }
}
