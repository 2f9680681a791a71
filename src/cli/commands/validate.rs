//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Invex configuration file.

use crate::adapters::database::create_session_provider;
use crate::cli::{EXIT_CONFIG, EXIT_CONNECTION, EXIT_OK};
use crate::config::load_config;
use crate::domain::SegmentCode;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also connect to every segment database
    #[arg(long)]
    pub check_connections: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Output Root: {}", config.output.root_dir);
        println!(
            "  Max Connections per Segment: {}",
            config.database.max_connections
        );
        println!(
            "  Statement Timeout: {}s",
            config.database.statement_timeout_seconds
        );
        match config.database.run_timeout_seconds {
            Some(secs) => println!("  Run Timeout: {secs}s"),
            None => println!("  Run Timeout: none"),
        }
        println!("  Segments:");
        for (code, segment) in &config.segments {
            println!("    {code}: {}", segment.connection_string_safe());
        }
        println!();

        if !self.check_connections {
            return Ok(EXIT_OK);
        }

        let sessions = match create_session_provider(&config) {
            Ok(s) => s,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let mut failures = 0;
        for code in sessions.segments() {
            let segment = match SegmentCode::new(code.as_str()) {
                Ok(s) => s,
                Err(e) => {
                    println!("❌ {code}: {e}");
                    failures += 1;
                    continue;
                }
            };
            match sessions.test_connection(&segment).await {
                Ok(()) => println!("✅ {code}: connected"),
                Err(e) => {
                    tracing::error!(segment = %code, error = %e, "Connection test failed");
                    println!("❌ {code}: {e}");
                    failures += 1;
                }
            }
        }
        println!();

        if failures > 0 {
            Ok(EXIT_CONNECTION)
        } else {
            Ok(EXIT_OK)
        }
    }
}
