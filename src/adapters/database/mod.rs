//! Database abstraction layer
//!
//! This module provides a trait-based abstraction for the extraction session,
//! keeping the pipeline independent of the concrete database driver.

pub mod factory;
pub mod traits;

pub use factory::create_session_provider;
pub use traits::{ExtractionSession, SessionProvider};
