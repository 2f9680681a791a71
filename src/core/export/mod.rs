//! Export orchestration and file output
//!
//! This module provides the core extraction logic for Invex, including:
//! - Pipeline orchestration over a database session
//! - Header/detail aggregation
//! - C0401 file writing
//! - Summary and reporting

pub mod aggregate;
pub mod coordinator;
pub mod summary;
pub mod writer;

pub use aggregate::{count_header_rows, count_invoices};
pub use coordinator::{ExtractionPipeline, PipelineState};
pub use summary::{ExtractionResponse, ExtractionSummary};
pub use writer::{ExportWriter, WrittenFile};
