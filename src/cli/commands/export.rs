//! Export command implementation
//!
//! This module implements the `export` command, which runs one extraction for
//! a segment and date and writes the C0401 file.

use crate::cli::{exit_code_for, EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use crate::core::export::ExtractionPipeline;
use crate::domain::ExtractionDate;
use clap::Args;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Business segment code (e.g. LP)
    pub segment: String,

    /// Extraction date as YYYYMMDD (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Print the result as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl ExportArgs {
    /// Date to extract, falling back to today's local date
    pub fn effective_date(&self) -> String {
        self.date
            .clone()
            .unwrap_or_else(|| ExtractionDate::today().to_string())
    }

    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(segment = %self.segment, "Starting export command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let pipeline = match ExtractionPipeline::from_config(&config) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create extraction pipeline");
                eprintln!("Failed to initialize export: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let date = self.effective_date();
        if !self.json {
            println!("🚀 Extracting segment {} for {}", self.segment, date);
        }

        let summary = match pipeline.run(&self.segment, &date).await {
            Ok(s) => s,
            Err(e) => {
                let step = e.step().map(|s| s.as_str()).unwrap_or("unknown");
                eprintln!("❌ Export failed ({step}): {e}");
                return Ok(exit_code_for(&e));
            }
        };

        summary.log_summary();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary.to_response())?);
        } else {
            println!();
            println!("📊 Export Summary:");
            println!("  Invoices: {}", summary.invoice_count());
            println!("  Rows: {}", summary.total_rows());
            println!("  File: {}", summary.file_path().display());
            println!("  SHA-256: {}", summary.checksum());
            println!("  Duration: {:.2}s", summary.duration().as_secs_f64());
            if summary.flagged_buyer_names() > 0 {
                println!(
                    "  ⚠️  Buyer names with rare characters: {}",
                    summary.flagged_buyer_names()
                );
            }
            println!();
            println!("✅ Export completed successfully!");
        }

        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_date_is_used() {
        let args = ExportArgs {
            segment: "LP".to_string(),
            date: Some("20240131".to_string()),
            json: false,
        };
        assert_eq!(args.effective_date(), "20240131");
    }

    #[test]
    fn test_missing_date_defaults_to_today() {
        let args = ExportArgs {
            segment: "LP".to_string(),
            date: None,
            json: true,
        };
        let date = args.effective_date();
        assert_eq!(date.len(), 8);
        assert!(ExtractionDate::parse(&date).is_ok());
    }

    #[tokio::test]
    async fn test_missing_config_is_config_exit_code() {
        let args = ExportArgs {
            segment: "LP".to_string(),
            date: Some("20240131".to_string()),
            json: false,
        };
        let code = args.execute("/nonexistent/invex.toml").await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
