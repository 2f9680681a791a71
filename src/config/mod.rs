//! Configuration management for Invex.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Invex uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `INVEX_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`OutputConfig`] - Export file root directory
//! - [`DatabaseConfig`] - Pool size and timeouts
//! - [`SegmentConfig`] - One database connection per business segment
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [output]
//! root_dir = "/data/einvoice"
//!
//! [database]
//! statement_timeout_seconds = 300
//! run_timeout_seconds = 600
//!
//! [segments.LP]
//! connection_string = "${INVEX_DSN_LP}"
//!
//! [segments.ND]
//! connection_string = "${INVEX_DSN_ND}"
//! ```
//!
//! Segment codes are matched case-insensitively.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, DatabaseConfig, InvexConfig, LoggingConfig, OutputConfig, SegmentConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
