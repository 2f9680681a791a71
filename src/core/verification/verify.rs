//! Export file verification

use super::checksum::calculate_checksum_bytes;
use super::report::{ExportFileReport, VerificationIssue};
use crate::domain::invoice::HEADER_ONLY_COLUMNS;
use crate::domain::{InvexError, Result, COLUMN_COUNT, EXPORT_COLUMNS, TRAILER_MARKER};
use std::path::Path;

/// Verify a C0401 export file
///
/// Problems with the file's contents are collected in the report rather than
/// returned as errors, so a truncated file still yields a full report.
///
/// # Errors
///
/// Returns a filesystem error only if the file cannot be read at all.
pub fn verify_export_file(path: impl AsRef<Path>) -> Result<ExportFileReport> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| InvexError::filesystem(path, e))?;
    let mut report = ExportFileReport::new(path, calculate_checksum_bytes(&bytes));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes.as_slice());

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                report.add_issue(VerificationIssue::at_line(
                    index + 1,
                    format!("unreadable line: {e}"),
                ));
                return Ok(report);
            }
        }
    }

    let Some((header, rest)) = records.split_first() else {
        report.add_issue(VerificationIssue::file("file is empty"));
        return Ok(report);
    };

    report.header_valid = header.iter().eq(EXPORT_COLUMNS.iter().copied());
    if !report.header_valid {
        report.add_issue(VerificationIssue::at_line(
            1,
            "header does not match the C0401 column layout",
        ));
    }

    let data = match rest.split_last() {
        Some((last, data)) if last.len() == 1 && &last[0] == TRAILER_MARKER => {
            report.trailer_present = true;
            data
        }
        _ => {
            report.add_issue(VerificationIssue::file(format!(
                "missing '{TRAILER_MARKER}' trailer, file is truncated"
            )));
            rest
        }
    };

    report.data_rows = data.len();
    for (offset, record) in data.iter().enumerate() {
        let line = offset + 2;
        if record.len() != COLUMN_COUNT {
            report.add_issue(VerificationIssue::at_line(
                line,
                format!("expected {COLUMN_COUNT} fields, found {}", record.len()),
            ));
            continue;
        }
        if HEADER_ONLY_COLUMNS.clone().any(|i| !record[i].is_empty()) {
            report.rows_with_header_fields += 1;
        }
    }

    Ok(report)
}
