//! Invoice row models
//!
//! Types for the row stream returned by the extraction query and for the
//! presentation-ready records written to the C0401 export file.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Number of columns in the export file
pub const COLUMN_COUNT: usize = 28;

/// Export file columns, in output order
pub const EXPORT_COLUMNS: [&str; COLUMN_COUNT] = [
    "InvoiceNumber",
    "InvoiceDate",
    "InvoiceTime",
    "BuyerIdentifier",
    "BuyerName",
    "BuyerAddress",
    "BuyerTelephoneNumber",
    "BuyerEmailAddress",
    "SalesAmount",
    "FreeTaxSalesAmount",
    "ZeroTaxSalesAmount",
    "TaxType",
    "TaxRate",
    "TaxAmount",
    "TotalAmount",
    "PrintMark",
    "RandomNumber",
    "MainRemark",
    "CarrierType",
    "CarrierId1",
    "CarrierId2",
    "NPOBAN",
    "Description",
    "Quantity",
    "UnitPrice",
    "Amount",
    "DetailTaxType",
    "Remark",
];

/// Columns only populated on the first line of an invoice (InvoiceDate..=NPOBAN)
pub const HEADER_ONLY_COLUMNS: Range<usize> = 1..22;

/// Trailer marker written as the last line of a complete export file
pub const TRAILER_MARKER: &str = "Finish";

/// Line number carried by the header-bearing row of every invoice
pub const HEADER_LINE_NO: i32 = 1;

/// Returns the output position of a column by name
pub fn column_index(name: &str) -> Option<usize> {
    EXPORT_COLUMNS.iter().position(|c| *c == name)
}

/// A nullable scalar as delivered by the database driver
///
/// Absence and a present empty string are kept apart; they only collapse to
/// the same display value when a record is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Scalar {
    /// A value was returned
    Present(String),
    /// The column was NULL
    #[default]
    Absent,
}

impl Scalar {
    /// Returns true if the column was NULL
    pub fn is_absent(&self) -> bool {
        matches!(self, Scalar::Absent)
    }

    /// Borrows the value if present
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Scalar::Present(value) => Some(value.as_str()),
            Scalar::Absent => None,
        }
    }
}

impl From<Option<String>> for Scalar {
    fn from(value: Option<String>) -> Self {
        value.map_or(Scalar::Absent, Scalar::Present)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Present(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Present(value)
    }
}

/// One row of the extraction query
///
/// Field order follows the query's select list. `line_no` is the only
/// non-nullable column and decides whether the header fields apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub invoice_number: Scalar,
    pub invoice_date: Scalar,
    pub invoice_time: Scalar,
    pub buyer_identifier: Scalar,
    pub buyer_name: Scalar,
    pub buyer_address: Scalar,
    pub buyer_telephone_number: Scalar,
    pub buyer_email_address: Scalar,
    pub sales_amount: Scalar,
    pub free_tax_sales_amount: Scalar,
    pub zero_tax_sales_amount: Scalar,
    pub tax_type: Scalar,
    pub tax_rate: Scalar,
    pub tax_amount: Scalar,
    pub total_amount: Scalar,
    pub print_mark: Scalar,
    pub random_number: Scalar,
    pub main_remark: Scalar,
    pub carrier_type: Scalar,
    pub carrier_id1: Scalar,
    pub carrier_id2: Scalar,
    pub npoban: Scalar,
    pub line_no: i32,
    pub description: Scalar,
    pub quantity: Scalar,
    pub unit_price: Scalar,
    pub amount: Scalar,
    pub detail_tax_type: Scalar,
    pub remark: Scalar,
}

impl RawRow {
    /// Returns true for the first line of an invoice
    pub fn is_header(&self) -> bool {
        self.line_no == HEADER_LINE_NO
    }
}

/// A display-ready export row
///
/// Produced from exactly one [`RawRow`]. The line number is not part of the
/// written columns but is kept so invoices can be counted from records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    line_no: i32,
    fields: [String; COLUMN_COUNT],
}

impl ExportRecord {
    /// Creates a record from already-rendered fields
    pub fn new(line_no: i32, fields: [String; COLUMN_COUNT]) -> Self {
        Self { line_no, fields }
    }

    /// Source line number
    pub fn line_no(&self) -> i32 {
        self.line_no
    }

    /// Returns true if the record carries invoice header columns
    pub fn is_header(&self) -> bool {
        self.line_no == HEADER_LINE_NO
    }

    /// Fields in output order
    pub fn fields(&self) -> &[String; COLUMN_COUNT] {
        &self.fields
    }

    /// Looks up a field by column name
    pub fn get(&self, column: &str) -> Option<&str> {
        column_index(column).map(|i| self.fields[i].as_str())
    }
}
