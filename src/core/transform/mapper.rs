//! Row mapping
//!
//! Turns extraction rows into export records. Mapping is all-or-nothing: one
//! malformed row fails the whole batch so that no partial file is ever written
//! for the billing system to ingest.

use super::normalize::to_display;
use super::unicode::contains_rare_ideograph;
use crate::domain::invoice::HEADER_ONLY_COLUMNS;
use crate::domain::{ExportRecord, InvexError, RawRow, Result, Scalar, COLUMN_COUNT};
use regex::Regex;
use std::sync::OnceLock;

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Number-to-text conversion may drop the leading zero (".5")
        Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("numeric pattern is valid")
    })
}

/// Records mapped from one extraction, in source order
#[derive(Debug, Clone, Default)]
pub struct MappedBatch {
    /// One record per source row
    pub records: Vec<ExportRecord>,

    /// Number of buyer names containing rare ideographs
    pub flagged_buyer_names: usize,
}

/// Maps a single row
///
/// # Arguments
///
/// * `index` - Zero-based position of the row in the stream, used in errors
/// * `row` - The row to map
///
/// # Errors
///
/// Returns [`InvexError::RowScan`] if the line number is not positive or a
/// required numeric column (Quantity, UnitPrice, Amount) is missing or not a
/// decimal number.
pub fn map_row(index: usize, row: &RawRow) -> Result<ExportRecord> {
    if row.line_no < 1 {
        return Err(InvexError::row_scan(
            index,
            format!("line number must be positive, got {}", row.line_no),
        ));
    }

    let quantity = required_numeric(index, "Quantity", &row.quantity)?;
    let unit_price = required_numeric(index, "UnitPrice", &row.unit_price)?;
    let amount = required_numeric(index, "Amount", &row.amount)?;

    let mut fields: [String; COLUMN_COUNT] = [
        to_display(&row.invoice_number),
        to_display(&row.invoice_date),
        to_display(&row.invoice_time),
        to_display(&row.buyer_identifier),
        to_display(&row.buyer_name),
        to_display(&row.buyer_address),
        to_display(&row.buyer_telephone_number),
        to_display(&row.buyer_email_address),
        to_display(&row.sales_amount),
        to_display(&row.free_tax_sales_amount),
        to_display(&row.zero_tax_sales_amount),
        to_display(&row.tax_type),
        to_display(&row.tax_rate),
        to_display(&row.tax_amount),
        to_display(&row.total_amount),
        to_display(&row.print_mark),
        to_display(&row.random_number),
        to_display(&row.main_remark),
        to_display(&row.carrier_type),
        to_display(&row.carrier_id1),
        to_display(&row.carrier_id2),
        to_display(&row.npoban),
        to_display(&row.description),
        quantity,
        unit_price,
        amount,
        to_display(&row.detail_tax_type),
        to_display(&row.remark),
    ];

    if !row.is_header() {
        for field in &mut fields[HEADER_ONLY_COLUMNS] {
            field.clear();
        }
    }

    Ok(ExportRecord::new(row.line_no, fields))
}

/// Maps every row of an extraction
///
/// Buyer names with rare ideographs are logged as warnings and counted; they
/// do not fail the batch.
///
/// # Errors
///
/// Returns the first row mapping error encountered.
pub fn map_rows(rows: &[RawRow]) -> Result<MappedBatch> {
    let mut batch = MappedBatch {
        records: Vec::with_capacity(rows.len()),
        flagged_buyer_names: 0,
    };

    for (index, row) in rows.iter().enumerate() {
        let record = map_row(index, row)?;

        if let Some(buyer_name) = record.get("BuyerName") {
            if contains_rare_ideograph(buyer_name) {
                tracing::warn!(
                    row = index,
                    invoice_number = record.get("InvoiceNumber").unwrap_or_default(),
                    buyer_name = %buyer_name,
                    "BuyerName contains rare characters"
                );
                batch.flagged_buyer_names += 1;
            }
        }

        batch.records.push(record);
    }

    Ok(batch)
}

fn required_numeric(index: usize, column: &str, value: &Scalar) -> Result<String> {
    match value.as_deref() {
        Some(text) if numeric_pattern().is_match(text) => Ok(text.to_string()),
        Some(text) => Err(InvexError::row_scan(
            index,
            format!("{column} is not a number: '{text}'"),
        )),
        None => Err(InvexError::row_scan(index, format!("{column} is missing"))),
    }
}
