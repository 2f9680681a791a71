//! Extraction pipeline - main orchestrator for one extraction run
//!
//! A run walks a fixed sequence of states:
//!
//! ```text
//! Idle -> ConnectionAcquired -> ProceduresInvoked -> RowsExtracted
//!      -> RecordsMapped -> FileWritten -> Done
//! ```
//!
//! Any failure moves the run to `Failed`, carrying the step that failed.
//! Nothing is retried and nothing is written unless every row mapped.

use crate::adapters::database::create_session_provider;
use crate::adapters::database::traits::SessionProvider;
use crate::config::InvexConfig;
use crate::core::export::aggregate::count_invoices;
use crate::core::export::summary::ExtractionSummary;
use crate::core::export::writer::ExportWriter;
use crate::core::transform::map_rows;
use crate::domain::{ExtractionDate, InvexError, PipelineStep, Result, SegmentCode};
use crate::{log_error_with_context, log_extraction_complete, log_extraction_start};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::Instrument;

/// States of an extraction run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    ConnectionAcquired,
    ProceduresInvoked,
    RowsExtracted,
    RecordsMapped,
    FileWritten,
    Done,
    Failed(PipelineStep),
}

impl PipelineState {
    /// Step that runs when leaving this state
    fn pending_step(&self) -> PipelineStep {
        match self {
            PipelineState::Idle => PipelineStep::Connection,
            PipelineState::ConnectionAcquired => PipelineStep::SetSegment,
            PipelineState::ProceduresInvoked => PipelineStep::Query,
            PipelineState::RowsExtracted => PipelineStep::RowScan,
            PipelineState::RecordsMapped
            | PipelineState::FileWritten
            | PipelineState::Done => PipelineStep::FileWrite,
            PipelineState::Failed(step) => *step,
        }
    }
}

struct RunState {
    current: PipelineState,
}

impl RunState {
    fn new() -> Self {
        Self {
            current: PipelineState::Idle,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        tracing::debug!(from = ?self.current, to = ?next, "Pipeline state transition");
        self.current = next;
    }

    fn fail(&mut self, error: &InvexError) {
        let step = error.step().unwrap_or_else(|| self.current.pending_step());
        self.advance(PipelineState::Failed(step));
    }
}

/// Runs extractions for any configured segment
pub struct ExtractionPipeline {
    sessions: Arc<dyn SessionProvider>,
    writer: ExportWriter,
    run_timeout: Option<Duration>,
}

impl ExtractionPipeline {
    /// Create a pipeline over an existing session provider
    pub fn new(sessions: Arc<dyn SessionProvider>, writer: ExportWriter) -> Self {
        Self {
            sessions,
            writer,
            run_timeout: None,
        }
    }

    /// Create a pipeline backed by the configured segment databases
    pub fn from_config(config: &InvexConfig) -> Result<Self> {
        let sessions = create_session_provider(config)?;
        let writer = ExportWriter::new(&config.output.root_dir);

        Ok(Self::new(sessions, writer).with_run_timeout(config.database.run_timeout()))
    }

    /// Bound every database call of a run by a deadline
    ///
    /// A timeout too large to place on the clock leaves the run unbounded.
    pub fn with_run_timeout(mut self, run_timeout: Option<Duration>) -> Self {
        self.run_timeout = run_timeout;
        self
    }

    /// Session provider backing this pipeline
    pub fn sessions(&self) -> &Arc<dyn SessionProvider> {
        &self.sessions
    }

    /// Export writer used by this pipeline
    pub fn writer(&self) -> &ExportWriter {
        &self.writer
    }

    /// Validate caller input and run an extraction
    ///
    /// # Arguments
    ///
    /// * `segment` - Business segment code, any casing
    /// * `date` - Extraction date as `YYYYMMDD`
    ///
    /// # Errors
    ///
    /// Returns [`InvexError::Validation`] before touching the database if
    /// either argument is malformed. Otherwise see [`execute`](Self::execute).
    pub async fn run(&self, segment: &str, date: &str) -> Result<ExtractionSummary> {
        let segment = SegmentCode::new(segment).map_err(InvexError::Validation)?;
        let date = ExtractionDate::parse(date).map_err(InvexError::Validation)?;

        self.execute(segment, date).await
    }

    /// Run an extraction for validated input
    ///
    /// # Errors
    ///
    /// Returns the first failure, tagged with the step it happened in. A
    /// failed run never replaces the file at the final export path; a file
    /// left there by an earlier run stays as it was.
    pub async fn execute(
        &self,
        segment: SegmentCode,
        date: ExtractionDate,
    ) -> Result<ExtractionSummary> {
        let span = tracing::info_span!("extraction", segment = %segment, date = %date);

        async move {
            let started = Instant::now();
            let deadline = self
                .run_timeout
                .and_then(|timeout| started.checked_add(timeout));
            let mut state = RunState::new();

            log_extraction_start!(&segment, &date);

            match self.execute_steps(&segment, date, deadline, &mut state).await {
                Ok(summary) => {
                    let summary = summary.with_duration(started.elapsed());
                    state.advance(PipelineState::Done);
                    log_extraction_complete!(
                        summary.invoice_count(),
                        summary.total_rows(),
                        summary.duration()
                    );
                    Ok(summary)
                }
                Err(e) => {
                    state.fail(&e);
                    log_error_with_context!(&e, "Extraction failed");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute_steps(
        &self,
        segment: &SegmentCode,
        date: ExtractionDate,
        deadline: Option<Instant>,
        state: &mut RunState,
    ) -> Result<ExtractionSummary> {
        let segment_key = segment.lookup_key();

        let mut session = bounded(
            deadline,
            PipelineStep::Connection,
            self.sessions.acquire(segment),
        )
        .await?;
        state.advance(PipelineState::ConnectionAcquired);

        bounded(
            deadline,
            PipelineStep::SetSegment,
            session.set_segment(&segment_key),
        )
        .await?;
        bounded(
            deadline,
            PipelineStep::MaterializeReport,
            session.materialize_report(date),
        )
        .await?;
        state.advance(PipelineState::ProceduresInvoked);

        let rows = bounded(deadline, PipelineStep::Query, session.fetch_rows()).await?;
        drop(session);
        state.advance(PipelineState::RowsExtracted);
        tracing::debug!(rows = rows.len(), "Rows extracted");

        let batch = map_rows(&rows)?;
        drop(rows);
        state.advance(PipelineState::RecordsMapped);

        let invoice_count = count_invoices(&batch.records);
        let total_rows = batch.records.len();
        let flagged_buyer_names = batch.flagged_buyer_names;

        let writer = self.writer.clone();
        let target = writer.output_path(segment, date);
        let owned_segment = segment.clone();
        let written =
            tokio::task::spawn_blocking(move || writer.write(&owned_segment, date, &batch.records))
                .await
                .map_err(|e| InvexError::filesystem(&target, e))??;
        state.advance(PipelineState::FileWritten);

        Ok(
            ExtractionSummary::new(segment, date, written.path, written.checksum)
                .with_counts(invoice_count, total_rows)
                .with_flagged_buyer_names(flagged_buyer_names),
        )
    }
}

/// Await a database call, attributing its failure to `step`
async fn bounded<T, F>(deadline: Option<Instant>, step: PipelineStep, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let outcome = match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, call)
            .await
            .map_err(|_| attribute(step, "run deadline exceeded".to_string()))?,
        None => call.await,
    };

    outcome.map_err(|e| {
        // Decoding failures surface from the query call but stay row scan errors
        let decoded_late = step == PipelineStep::Query && matches!(e, InvexError::RowScan { .. });
        if e.step() == Some(step) || decoded_late {
            e
        } else {
            attribute(step, e.to_string())
        }
    })
}

fn attribute(step: PipelineStep, message: String) -> InvexError {
    match step {
        PipelineStep::Connection => InvexError::Connection(message),
        PipelineStep::SetSegment | PipelineStep::MaterializeReport => {
            InvexError::procedure(step, message)
        }
        PipelineStep::Query => InvexError::Query(message),
        PipelineStep::Validation => InvexError::Validation(message),
        PipelineStep::RowScan => InvexError::row_scan(0, message),
        PipelineStep::FileWrite => InvexError::Io(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_step_follows_state() {
        assert_eq!(PipelineState::Idle.pending_step(), PipelineStep::Connection);
        assert_eq!(
            PipelineState::ProceduresInvoked.pending_step(),
            PipelineStep::Query
        );
        assert_eq!(
            PipelineState::Failed(PipelineStep::RowScan).pending_step(),
            PipelineStep::RowScan
        );
    }

    #[test]
    fn test_run_state_fail_uses_error_step() {
        let mut state = RunState::new();
        state.advance(PipelineState::ConnectionAcquired);
        state.fail(&InvexError::procedure(PipelineStep::MaterializeReport, "boom"));
        assert_eq!(
            state.current,
            PipelineState::Failed(PipelineStep::MaterializeReport)
        );
    }

    #[test]
    fn test_run_state_fail_falls_back_to_pending_step() {
        let mut state = RunState::new();
        state.fail(&InvexError::Io("broken pipe".to_string()));
        assert_eq!(state.current, PipelineState::Failed(PipelineStep::Connection));
    }

    #[tokio::test]
    async fn test_bounded_retags_foreign_errors() {
        let err = bounded(None, PipelineStep::SetSegment, async {
            Err::<(), _>(InvexError::Query("P0001".to_string()))
        })
        .await
        .unwrap_err();
        assert_eq!(err.step(), Some(PipelineStep::SetSegment));
        assert!(err.to_string().contains("P0001"));
    }

    #[tokio::test]
    async fn test_bounded_keeps_row_scan_from_query() {
        let err = bounded(None, PipelineStep::Query, async {
            Err::<(), _>(InvexError::row_scan(3, "bad column"))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, InvexError::RowScan { row: 3, .. }));
    }

    #[tokio::test]
    async fn test_bounded_deadline_fails_step_in_flight() {
        let deadline = Instant::now() + Duration::from_millis(50);
        let err = bounded(Some(deadline), PipelineStep::MaterializeReport, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, InvexError>(())
        })
        .await
        .unwrap_err();
        assert_eq!(err.step(), Some(PipelineStep::MaterializeReport));
        assert!(err.to_string().contains("deadline"));
    }
}
