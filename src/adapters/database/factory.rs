//! Session provider factory
//!
//! This module builds the session provider from configuration.

use crate::adapters::database::traits::SessionProvider;
use crate::adapters::postgresql::PostgresSessionProvider;
use crate::config::schema::InvexConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create a session provider for every configured segment
///
/// # Arguments
///
/// * `config` - The Invex configuration
///
/// # Returns
///
/// Returns an Arc-wrapped trait object that implements SessionProvider
///
/// # Errors
///
/// Returns an error if a segment's connection settings are unusable
pub fn create_session_provider(config: &InvexConfig) -> Result<Arc<dyn SessionProvider>> {
    tracing::info!(
        segments = config.segments.len(),
        "Creating PostgreSQL session provider"
    );
    let provider = PostgresSessionProvider::new(&config.segments, &config.database)?;

    Ok(Arc::new(provider) as Arc<dyn SessionProvider>)
}
