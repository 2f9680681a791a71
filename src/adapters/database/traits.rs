//! Database abstraction traits
//!
//! This module defines the traits a database backend implements to serve an
//! extraction run. The pipeline only ever talks to these traits, so tests can
//! substitute an in-memory session that records what was called.

use crate::domain::{ExtractionDate, RawRow, Result, SegmentCode};
use async_trait::async_trait;

/// Hands out database sessions per segment
///
/// Each segment maps to its own database; the provider is built from an
/// explicit segment table rather than process-wide state.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Acquire a dedicated session for a segment
    ///
    /// The session is released when the returned box is dropped, on every
    /// exit path of the caller.
    ///
    /// # Errors
    ///
    /// Returns [`InvexError::Connection`](crate::domain::InvexError::Connection)
    /// if the segment is not configured or no connection can be obtained.
    async fn acquire(&self, segment: &SegmentCode) -> Result<Box<dyn ExtractionSession>>;

    /// Test connectivity for a segment without running anything
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self, segment: &SegmentCode) -> Result<()>;

    /// Segments this provider can serve, upper-cased
    fn segments(&self) -> Vec<String>;
}

/// One database session used for a whole extraction run
///
/// Staging data produced by the two preparation calls is session scoped, so
/// all three calls must go through the same session and in this order:
/// [`set_segment`](Self::set_segment), [`materialize_report`](Self::materialize_report),
/// [`fetch_rows`](Self::fetch_rows).
#[async_trait]
pub trait ExtractionSession: Send {
    /// Set the segment context for the session
    ///
    /// # Arguments
    ///
    /// * `segment_key` - Upper-cased segment code
    async fn set_segment(&mut self, segment_key: &str) -> Result<()>;

    /// Populate the staging area with the report for `date`
    async fn materialize_report(&mut self, date: ExtractionDate) -> Result<()>;

    /// Run the extraction query
    ///
    /// Rows come back ordered by invoice number, then line number.
    ///
    /// # Errors
    ///
    /// Returns a query error if the statement fails, or a row scan error if a
    /// row does not have the expected shape.
    async fn fetch_rows(&mut self) -> Result<Vec<RawRow>>;
}
