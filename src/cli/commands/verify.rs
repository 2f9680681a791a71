//! Verify command implementation
//!
//! Re-reads a C0401 file and reports whether it is complete and well formed.

use crate::cli::{exit_code_for, EXIT_OK, EXIT_VERIFICATION};
use crate::core::verification::verify_export_file;
use clap::Args;

/// Arguments for the verify command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path of the export file
    pub path: String,

    /// Print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl VerifyArgs {
    /// Execute the verify command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(path = %self.path, "Verifying export file");

        let report = match verify_export_file(&self.path) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("❌ Cannot read {}: {e}", self.path);
                return Ok(exit_code_for(&e));
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("🔍 Verification of {}", report.path.display());
            println!("  Header: {}", if report.header_valid { "ok" } else { "invalid" });
            println!(
                "  Trailer: {}",
                if report.trailer_present { "present" } else { "missing" }
            );
            println!("  Data rows: {}", report.data_rows);
            println!("  Header rows: {}", report.rows_with_header_fields);
            println!("  SHA-256: {}", report.checksum);

            if !report.issues.is_empty() {
                println!();
                println!("⚠️  Issues:");
                for issue in report.issues.iter().take(10) {
                    match issue.line {
                        Some(line) => println!("  - line {line}: {}", issue.reason),
                        None => println!("  - {}", issue.reason),
                    }
                }
                if report.issues.len() > 10 {
                    println!("  ... and {} more issues", report.issues.len() - 10);
                }
            }
            println!();
        }

        if report.is_valid() {
            if !self.json {
                println!("✅ Export file is complete");
            }
            Ok(EXIT_OK)
        } else {
            if report.is_truncated() {
                tracing::warn!(path = %self.path, "Export file is truncated");
            }
            if !self.json {
                println!("❌ Export file failed verification");
            }
            Ok(EXIT_VERIFICATION)
        }
    }
}
