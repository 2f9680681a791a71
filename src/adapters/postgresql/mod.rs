//! PostgreSQL database integration
//!
//! This module serves extraction sessions from the ERP databases, one per
//! business segment.

pub mod client;
pub mod query;
pub mod session;

pub use client::PostgresSessionProvider;
pub use session::PostgresSession;
