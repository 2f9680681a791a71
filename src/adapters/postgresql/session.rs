//! PostgreSQL extraction session

use super::query::{
    EXTRACTION_COLUMN_COUNT, EXTRACTION_QUERY, LINE_NO_POSITION, MATERIALIZE_REPORT_CALL,
    SET_SEGMENT_CALL,
};
use crate::adapters::database::traits::ExtractionSession;
use crate::domain::{ExtractionDate, InvexError, PipelineStep, RawRow, Result, Scalar};
use async_trait::async_trait;
use deadpool_postgres::Object;
use tokio_postgres::Row;

/// A pooled connection dedicated to one extraction run
///
/// The connection returns to its pool when the session is dropped.
pub struct PostgresSession {
    client: Object,
}

impl PostgresSession {
    /// Wrap a pooled connection
    pub fn new(client: Object) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ExtractionSession for PostgresSession {
    async fn set_segment(&mut self, segment_key: &str) -> Result<()> {
        self.client
            .execute(SET_SEGMENT_CALL, &[&segment_key])
            .await
            .map_err(|e| InvexError::procedure(PipelineStep::SetSegment, e.to_string()))?;

        tracing::debug!(segment = segment_key, "Segment context set");
        Ok(())
    }

    async fn materialize_report(&mut self, date: ExtractionDate) -> Result<()> {
        let report_date = date.as_date();
        self.client
            .execute(MATERIALIZE_REPORT_CALL, &[&report_date])
            .await
            .map_err(|e| InvexError::procedure(PipelineStep::MaterializeReport, e.to_string()))?;

        tracing::debug!(date = %date, "Report materialized");
        Ok(())
    }

    async fn fetch_rows(&mut self) -> Result<Vec<RawRow>> {
        let rows = self
            .client
            .query(EXTRACTION_QUERY, &[])
            .await
            .map_err(|e| InvexError::Query(format!("Extraction query failed: {e}")))?;

        rows.iter()
            .enumerate()
            .map(|(index, row)| decode_row(index, row))
            .collect()
    }
}

fn decode_row(index: usize, row: &Row) -> Result<RawRow> {
    if row.len() != EXTRACTION_COLUMN_COUNT {
        return Err(InvexError::row_scan(
            index,
            format!(
                "expected {EXTRACTION_COLUMN_COUNT} columns, got {}",
                row.len()
            ),
        ));
    }

    let text = |column: usize| -> Result<Scalar> {
        row.try_get::<_, Option<String>>(column)
            .map(Scalar::from)
            .map_err(|e| InvexError::row_scan(index, format!("column {column}: {e}")))
    };

    let line_no: i32 = row
        .try_get(LINE_NO_POSITION)
        .map_err(|e| InvexError::row_scan(index, format!("line_no: {e}")))?;

    Ok(RawRow {
        invoice_number: text(0)?,
        invoice_date: text(1)?,
        invoice_time: text(2)?,
        buyer_identifier: text(3)?,
        buyer_name: text(4)?,
        buyer_address: text(5)?,
        buyer_telephone_number: text(6)?,
        buyer_email_address: text(7)?,
        sales_amount: text(8)?,
        free_tax_sales_amount: text(9)?,
        zero_tax_sales_amount: text(10)?,
        tax_type: text(11)?,
        tax_rate: text(12)?,
        tax_amount: text(13)?,
        total_amount: text(14)?,
        print_mark: text(15)?,
        random_number: text(16)?,
        main_remark: text(17)?,
        carrier_type: text(18)?,
        carrier_id1: text(19)?,
        carrier_id2: text(20)?,
        npoban: text(21)?,
        line_no,
        description: text(23)?,
        quantity: text(24)?,
        unit_price: text(25)?,
        amount: text(26)?,
        detail_tax_type: text(27)?,
        remark: text(28)?,
    })
}
