//! Header/detail aggregation
//!
//! The row stream folds invoice headers and their lines together; an invoice
//! starts wherever a header-bearing row appears. Counting those rows in a
//! single forward pass gives the number of invoices without regrouping.

use crate::domain::invoice::HEADER_LINE_NO;
use crate::domain::ExportRecord;

/// Counts header-bearing line numbers
///
/// # Examples
///
/// ```
/// use invex::core::export::aggregate::count_header_rows;
///
/// assert_eq!(count_header_rows([1, 2, 3, 1, 1, 2]), 3);
/// assert_eq!(count_header_rows(std::iter::empty()), 0);
/// ```
pub fn count_header_rows(line_numbers: impl IntoIterator<Item = i32>) -> usize {
    line_numbers
        .into_iter()
        .filter(|line_no| *line_no == HEADER_LINE_NO)
        .count()
}

/// Counts invoices among records about to be written
pub fn count_invoices(records: &[ExportRecord]) -> usize {
    count_header_rows(records.iter().map(ExportRecord::line_no))
}
