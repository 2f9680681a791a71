// Invex - C0401 E-Invoice Export Tool
// Copyright (c) 2025 Invex Contributors
// Licensed under the MIT License

//! # Invex - C0401 e-invoice export
//!
//! Invex extracts a business segment's invoices for one day from the ERP
//! database and writes them as a C0401 CSV file for the e-invoice platform.
//!
//! ## Overview
//!
//! One extraction run:
//! - **Prepares** the database session: segment context, then the report for the date
//! - **Extracts** the staged rows, ordered by invoice and line number
//! - **Maps** each row to an export record, blanking header columns on detail lines
//! - **Writes** header, records and a `Finish` trailer to `{root}/cxnvol/{segment}`
//! - **Reports** the invoice count, row count and file path
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (export, transform, verification)
//! - [`adapters`] - Database session abstraction and PostgreSQL implementation
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use invex::config::load_config;
//! use invex::core::export::ExtractionPipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("invex.toml")?;
//!     let pipeline = ExtractionPipeline::from_config(&config)?;
//!
//!     let summary = pipeline.run("LP", "20240131").await?;
//!
//!     println!(
//!         "Wrote {} invoices ({} rows) to {}",
//!         summary.invoice_count(),
//!         summary.total_rows(),
//!         summary.file_path().display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is an [`domain::InvexError`] naming the pipeline step it came
//! from, so a failed procedure call is never mistaken for a failed file write:
//!
//! ```rust
//! use invex::domain::{InvexError, PipelineStep};
//!
//! let err = InvexError::procedure(PipelineStep::SetSegment, "segment not found");
//! assert_eq!(err.step(), Some(PipelineStep::SetSegment));
//! ```
//!
//! ## Logging
//!
//! Invex uses structured logging with the `tracing` crate. Each run is wrapped
//! in a span carrying the segment and date.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
