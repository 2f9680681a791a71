//! Core business logic for Invex.
//!
//! # Modules
//!
//! - [`export`] - Pipeline orchestration, aggregation and file writing
//! - [`transform`] - Row to export record mapping
//! - [`verification`] - Export file re-reading and checksums
//!
//! # Extraction Workflow
//!
//! 1. **Connect**: Acquire a session on the segment's database
//! 2. **Prepare**: Set the segment context, then materialize the report for the date
//! 3. **Extract**: Read the staged rows, ordered by invoice and line number
//! 4. **Map**: Normalize every row; any malformed row aborts the run
//! 5. **Write**: Header, records and `Finish` trailer, renamed into place
//! 6. **Report**: Invoice count, row count and file path
//!
//! # Example
//!
//! ```rust,no_run
//! use invex::config::load_config;
//! use invex::core::export::ExtractionPipeline;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("invex.toml")?;
//! let pipeline = ExtractionPipeline::from_config(&config)?;
//!
//! let summary = pipeline.run("LP", "20240131").await?;
//!
//! println!("Invoices: {}", summary.invoice_count());
//! println!("Rows: {}", summary.total_rows());
//! println!("File: {}", summary.file_path().display());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod transform;
pub mod verification;
