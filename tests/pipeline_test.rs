//! Integration tests for the extraction pipeline
//!
//! These tests run the pipeline against an in-memory session provider that
//! records every call, so no database is needed.

use async_trait::async_trait;
use invex::adapters::database::{ExtractionSession, SessionProvider};
use invex::core::export::{ExportWriter, ExtractionPipeline};
use invex::domain::{
    ExtractionDate, InvexError, PipelineStep, RawRow, Result, Scalar, SegmentCode,
};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Acquire(String),
    SetSegment(String),
    MaterializeReport(String),
    FetchRows,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FailAt {
    Nowhere,
    SetSegment,
    MaterializeReport,
    Query,
}

struct FakeProvider {
    segments: Vec<String>,
    rows: Vec<RawRow>,
    fail_at: FailAt,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeProvider {
    fn new(rows: Vec<RawRow>) -> Self {
        Self {
            segments: vec!["LP".to_string()],
            rows,
            fail_at: FailAt::Nowhere,
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn failing_at(mut self, fail_at: FailAt) -> Self {
        self.fail_at = fail_at;
        self
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

struct FakeSession {
    rows: Vec<RawRow>,
    fail_at: FailAt,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeSession {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SessionProvider for FakeProvider {
    async fn acquire(&self, segment: &SegmentCode) -> Result<Box<dyn ExtractionSession>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Acquire(segment.lookup_key()));
        if !self.segments.contains(&segment.lookup_key()) {
            return Err(InvexError::Connection(format!(
                "No database configured for segment '{segment}'"
            )));
        }
        Ok(Box::new(FakeSession {
            rows: self.rows.clone(),
            fail_at: self.fail_at,
            delay: self.delay,
            calls: self.calls.clone(),
        }))
    }

    async fn test_connection(&self, _segment: &SegmentCode) -> Result<()> {
        Ok(())
    }

    fn segments(&self) -> Vec<String> {
        self.segments.clone()
    }
}

#[async_trait]
impl ExtractionSession for FakeSession {
    async fn set_segment(&mut self, segment_key: &str) -> Result<()> {
        self.record(Call::SetSegment(segment_key.to_string()));
        if self.fail_at == FailAt::SetSegment {
            return Err(InvexError::procedure(
                PipelineStep::SetSegment,
                "unknown segment",
            ));
        }
        Ok(())
    }

    async fn materialize_report(&mut self, date: ExtractionDate) -> Result<()> {
        self.record(Call::MaterializeReport(date.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_at == FailAt::MaterializeReport {
            return Err(InvexError::procedure(
                PipelineStep::MaterializeReport,
                "report failed",
            ));
        }
        Ok(())
    }

    async fn fetch_rows(&mut self) -> Result<Vec<RawRow>> {
        self.record(Call::FetchRows);
        if self.fail_at == FailAt::Query {
            return Err(InvexError::Query("relation does not exist".to_string()));
        }
        Ok(self.rows.clone())
    }
}

fn header_row(invoice: &str, buyer: &str, quantity: &str, price: &str, amount: &str) -> RawRow {
    RawRow {
        invoice_number: Scalar::from(invoice),
        invoice_date: Scalar::from("20240131"),
        buyer_name: Scalar::from(buyer),
        line_no: 1,
        description: Scalar::from("widget"),
        quantity: Scalar::from(quantity),
        unit_price: Scalar::from(price),
        amount: Scalar::from(amount),
        ..RawRow::default()
    }
}

fn detail_row(invoice: &str, line_no: i32, description: &str, quantity: &str) -> RawRow {
    RawRow {
        invoice_number: Scalar::from(invoice),
        line_no,
        description: Scalar::from(description),
        quantity: Scalar::from(quantity),
        unit_price: Scalar::from("5"),
        amount: Scalar::from("5"),
        ..RawRow::default()
    }
}

fn pipeline(provider: FakeProvider, root: &Path) -> (ExtractionPipeline, Arc<Mutex<Vec<Call>>>) {
    let calls = provider.calls.clone();
    let pipeline = ExtractionPipeline::new(Arc::new(provider), ExportWriter::new(root));
    (pipeline, calls)
}

fn lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_single_invoice_with_two_lines() {
    let temp_dir = TempDir::new().unwrap();
    let rows = vec![
        header_row("INV1", "Acme", "2", "10", "20"),
        detail_row("INV1", 2, "extra", "1"),
    ];
    let (pipeline, calls) = pipeline(FakeProvider::new(rows), temp_dir.path());

    let summary = pipeline.run("LP", "20240131").await.unwrap();

    assert_eq!(summary.invoice_count(), 1);
    assert_eq!(summary.total_rows(), 2);
    assert_eq!(
        summary.file_path(),
        temp_dir.path().join("cxnvol/LP/C0401-20240131-LP.csv")
    );
    assert_eq!(summary.checksum().len(), 64);

    let lines = lines(summary.file_path());
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("InvoiceNumber,InvoiceDate,"));
    assert!(lines[1].starts_with("INV1,20240131,,,Acme,"));
    assert!(lines[2].starts_with("INV1,,,,,,,,,,,,,,,,,,,,,,extra,1,5,5"));
    assert_eq!(lines[3], "Finish");

    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            Call::Acquire("LP".to_string()),
            Call::SetSegment("LP".to_string()),
            Call::MaterializeReport("20240131".to_string()),
            Call::FetchRows,
        ]
    );
}

#[tokio::test]
async fn test_detail_lines_never_carry_header_fields() {
    let temp_dir = TempDir::new().unwrap();
    let mut detail = detail_row("INV1", 2, "extra", "1");
    // Header values leaking onto a detail line are dropped
    detail.buyer_name = Scalar::from("Acme");
    detail.total_amount = Scalar::from("20");
    let rows = vec![header_row("INV1", "Acme", "2", "10", "20"), detail];
    let (pipeline, _) = pipeline(FakeProvider::new(rows), temp_dir.path());

    let summary = pipeline.run("LP", "20240131").await.unwrap();

    let lines = lines(summary.file_path());
    let fields: Vec<&str> = lines[2].split(',').collect();
    assert_eq!(fields.len(), 28);
    assert!(fields[1..22].iter().all(|f| f.is_empty()));
}

#[tokio::test]
async fn test_empty_stream_writes_header_and_trailer() {
    let temp_dir = TempDir::new().unwrap();
    let (pipeline, _) = pipeline(FakeProvider::new(Vec::new()), temp_dir.path());

    let summary = pipeline.run("LP", "20240131").await.unwrap();

    assert_eq!(summary.invoice_count(), 0);
    assert_eq!(summary.total_rows(), 0);
    let lines = lines(summary.file_path());
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "Finish");
}

#[tokio::test]
async fn test_multiple_invoices_are_counted() {
    let temp_dir = TempDir::new().unwrap();
    let rows = vec![
        header_row("INV1", "Acme", "2", "10", "20"),
        detail_row("INV1", 2, "extra", "1"),
        header_row("INV2", "Globex", "1", "3.5", "3.5"),
        header_row("INV3", "Initech", ".5", "4", "2"),
        detail_row("INV3", 2, "more", "3"),
        detail_row("INV3", 3, "even more", "-1"),
    ];
    let (pipeline, _) = pipeline(FakeProvider::new(rows), temp_dir.path());

    let summary = pipeline.run("LP", "20240131").await.unwrap();

    assert_eq!(summary.invoice_count(), 3);
    assert_eq!(summary.total_rows(), 6);
    assert_eq!(lines(summary.file_path()).len(), 8);
}

#[tokio::test]
async fn test_row_scan_error_leaves_no_file() {
    let temp_dir = TempDir::new().unwrap();
    let rows = vec![
        header_row("INV1", "Acme", "2", "10", "20"),
        detail_row("INV1", 2, "extra", "one"),
    ];
    let (pipeline, _) = pipeline(FakeProvider::new(rows), temp_dir.path());

    let err = pipeline.run("LP", "20240131").await.unwrap_err();

    assert!(matches!(err, InvexError::RowScan { row: 1, .. }));
    assert_eq!(err.step(), Some(PipelineStep::RowScan));
    assert!(!temp_dir
        .path()
        .join("cxnvol/LP/C0401-20240131-LP.csv")
        .exists());
}

#[tokio::test]
async fn test_row_scan_error_keeps_previous_file() {
    let temp_dir = TempDir::new().unwrap();
    let good = vec![header_row("INV1", "Acme", "2", "10", "20")];
    let (pipeline_ok, _) = pipeline(FakeProvider::new(good), temp_dir.path());
    let summary = pipeline_ok.run("LP", "20240131").await.unwrap();
    let before = std::fs::read(summary.file_path()).unwrap();

    let bad = vec![detail_row("INV1", 0, "extra", "1")];
    let (pipeline_bad, _) = pipeline(FakeProvider::new(bad), temp_dir.path());
    assert!(pipeline_bad.run("LP", "20240131").await.is_err());

    assert_eq!(std::fs::read(summary.file_path()).unwrap(), before);
}

#[tokio::test]
async fn test_reruns_are_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let rows = vec![
        header_row("INV1", "Acme, Inc.", "2", "10", "20"),
        detail_row("INV1", 2, "say \"hi\"", "1"),
    ];
    let (pipeline, _) = pipeline(FakeProvider::new(rows), temp_dir.path());

    let first = pipeline.run("LP", "20240131").await.unwrap();
    let first_bytes = std::fs::read(first.file_path()).unwrap();
    let second = pipeline.run("LP", "20240131").await.unwrap();
    let second_bytes = std::fs::read(second.file_path()).unwrap();

    assert_eq!(first_bytes, second_bytes);
    assert_eq!(first.checksum(), second.checksum());
}

#[tokio::test]
async fn test_segment_casing() {
    let temp_dir = TempDir::new().unwrap();
    let rows = vec![header_row("INV1", "Acme", "2", "10", "20")];
    let (pipeline, calls) = pipeline(FakeProvider::new(rows), temp_dir.path());

    let summary = pipeline.run("lp", "20240131").await.unwrap();

    assert_eq!(
        summary.file_path(),
        temp_dir.path().join("cxnvol/lp/C0401-20240131-lp.csv")
    );
    assert!(calls
        .lock()
        .unwrap()
        .contains(&Call::SetSegment("LP".to_string())));
}

#[tokio::test]
async fn test_rare_buyer_name_is_flagged_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let rows = vec![header_row("INV1", "\u{20000}記", "2", "10", "20")];
    let (pipeline, _) = pipeline(FakeProvider::new(rows), temp_dir.path());

    let summary = pipeline.run("LP", "20240131").await.unwrap();

    assert_eq!(summary.flagged_buyer_names(), 1);
    let content = std::fs::read_to_string(summary.file_path()).unwrap();
    assert!(content.contains('\u{20000}'));
}

#[tokio::test]
async fn test_unknown_segment_is_connection_error() {
    let temp_dir = TempDir::new().unwrap();
    let (pipeline, calls) = pipeline(FakeProvider::new(Vec::new()), temp_dir.path());

    let err = pipeline.run("ZZ", "20240131").await.unwrap_err();

    assert!(matches!(err, InvexError::Connection(_)));
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_input_never_reaches_database() {
    let temp_dir = TempDir::new().unwrap();
    let (pipeline, calls) = pipeline(FakeProvider::new(Vec::new()), temp_dir.path());

    for (segment, date) in [
        ("LP", "2024-01-31"),
        ("LP", "20240230"),
        ("LP", ""),
        ("", "20240131"),
        ("../etc", "20240131"),
    ] {
        let err = pipeline.run(segment, date).await.unwrap_err();
        assert!(
            matches!(err, InvexError::Validation(_)),
            "{segment:?}/{date:?} gave {err}"
        );
    }

    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_set_segment_failure_stops_preparation() {
    let temp_dir = TempDir::new().unwrap();
    let provider = FakeProvider::new(Vec::new()).failing_at(FailAt::SetSegment);
    let (pipeline, calls) = pipeline(provider, temp_dir.path());

    let err = pipeline.run("LP", "20240131").await.unwrap_err();

    assert_eq!(err.step(), Some(PipelineStep::SetSegment));
    assert_eq!(calls.lock().unwrap().len(), 2);
    assert!(!temp_dir.path().join("cxnvol").exists());
}

#[tokio::test]
async fn test_materialize_failure_names_report_step() {
    let temp_dir = TempDir::new().unwrap();
    let provider = FakeProvider::new(Vec::new()).failing_at(FailAt::MaterializeReport);
    let (pipeline, calls) = pipeline(provider, temp_dir.path());

    let err = pipeline.run("LP", "20240131").await.unwrap_err();

    assert_eq!(err.step(), Some(PipelineStep::MaterializeReport));
    assert!(!calls.lock().unwrap().contains(&Call::FetchRows));
}

#[tokio::test]
async fn test_query_failure() {
    let temp_dir = TempDir::new().unwrap();
    let provider = FakeProvider::new(Vec::new()).failing_at(FailAt::Query);
    let (pipeline, _) = pipeline(provider, temp_dir.path());

    let err = pipeline.run("LP", "20240131").await.unwrap_err();

    assert!(matches!(err, InvexError::Query(_)));
}

#[tokio::test]
async fn test_run_deadline_fails_step_in_flight() {
    let temp_dir = TempDir::new().unwrap();
    let provider = FakeProvider::new(Vec::new()).slow(Duration::from_secs(5));
    let (pipeline, calls) = pipeline(provider, temp_dir.path());
    let pipeline = pipeline.with_run_timeout(Some(Duration::from_millis(50)));

    let err = pipeline.run("LP", "20240131").await.unwrap_err();

    assert_eq!(err.step(), Some(PipelineStep::MaterializeReport));
    assert!(!calls.lock().unwrap().contains(&Call::FetchRows));
}

#[tokio::test]
async fn test_unrepresentable_run_timeout_leaves_run_unbounded() {
    let temp_dir = TempDir::new().unwrap();
    let rows = vec![header_row("INV1", "Acme", "1", "5", "5")];
    let (pipeline, _calls) = pipeline(FakeProvider::new(rows), temp_dir.path());
    let pipeline = pipeline.with_run_timeout(Some(Duration::from_secs(i64::MAX as u64)));

    let summary = pipeline.run("LP", "20240131").await.unwrap();

    assert_eq!(summary.invoice_count(), 1);
}

#[tokio::test]
async fn test_execute_with_validated_input() {
    let temp_dir = TempDir::new().unwrap();
    let rows = vec![header_row("INV9", "Acme", "1", "1", "1")];
    let (pipeline, _) = pipeline(FakeProvider::new(rows), temp_dir.path());

    let summary = pipeline
        .execute(
            SegmentCode::new("LP").unwrap(),
            ExtractionDate::parse("20241231").unwrap(),
        )
        .await
        .unwrap();

    assert!(summary
        .file_path()
        .ends_with("cxnvol/LP/C0401-20241231-LP.csv"));
    assert_eq!(summary.to_response().message, "CSV generated successfully");
}
