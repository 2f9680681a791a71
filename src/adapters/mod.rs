//! External system integrations for Invex.
//!
//! - [`database`] - Session abstraction the pipeline runs against
//! - [`postgresql`] - PostgreSQL implementation with one pool per segment
//!
//! # Design Pattern
//!
//! Adapters isolate the database driver behind the traits in
//! [`database::traits`], so the pipeline can be tested against an in-memory
//! session that records the calls it receives.
//!
//! ```rust,no_run
//! use invex::adapters::database::create_session_provider;
//! use invex::config::load_config;
//! use invex::domain::SegmentCode;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("invex.toml")?;
//! let sessions = create_session_provider(&config)?;
//! sessions.test_connection(&SegmentCode::new("LP")?).await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod postgresql;
