//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Invex using clap.

pub mod commands;

use crate::domain::InvexError;
use clap::{Parser, Subcommand};

/// Exit code for a successful command
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration or input validation errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for an export file that failed verification
pub const EXIT_VERIFICATION: i32 = 3;
/// Exit code for database connection errors
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code for everything else
pub const EXIT_FATAL: i32 = 5;

/// Invex - C0401 e-invoice export tool
#[derive(Parser, Debug)]
#[command(name = "invex")]
#[command(version, about, long_about = None)]
#[command(author = "Invex Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "invex.toml", env = "INVEX_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "INVEX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a segment's invoices for a date into a C0401 file
    Export(commands::export::ExportArgs),

    /// Check a written C0401 file
    Verify(commands::verify::VerifyArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Maps an error to the process exit code
pub fn exit_code_for(error: &InvexError) -> i32 {
    match error {
        InvexError::Configuration(_) | InvexError::Validation(_) => EXIT_CONFIG,
        InvexError::Connection(_) => EXIT_CONNECTION,
        _ => EXIT_FATAL,
    }
}
