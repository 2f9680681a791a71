//! PostgreSQL session provider
//!
//! This module keeps one connection pool per configured segment and hands
//! out extraction sessions from them.

use super::session::PostgresSession;
use crate::adapters::database::traits::{ExtractionSession, SessionProvider};
use crate::config::{DatabaseConfig, SegmentConfig};
use crate::domain::{InvexError, Result, SegmentCode};
use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use secrecy::ExposeSecret;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio_postgres::NoTls;

/// Largest `statement_timeout` PostgreSQL accepts, in milliseconds
const MAX_STATEMENT_TIMEOUT_MS: u64 = i32::MAX as u64;

/// Session provider backed by one pool per segment
pub struct PostgresSessionProvider {
    /// Pools keyed by upper-cased segment code
    pools: BTreeMap<String, Pool>,

    /// Session statement timeout in milliseconds (0 disables it)
    statement_timeout_ms: u64,
}

impl PostgresSessionProvider {
    /// Create a provider for the given segment table
    ///
    /// Pools connect lazily, so this does not touch the network.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if two segment codes differ only in
    /// case, a connection string cannot be parsed or a pool cannot be built.
    pub fn new(
        segments: &BTreeMap<String, SegmentConfig>,
        database: &DatabaseConfig,
    ) -> Result<Self> {
        let mut pools = BTreeMap::new();
        for (code, segment) in segments {
            let key = code.to_ascii_uppercase();
            if pools.contains_key(&key) {
                return Err(InvexError::Configuration(format!(
                    "Segment '{code}' is configured more than once (codes are case-insensitive)"
                )));
            }
            let pool = build_pool(code, segment, database)?;
            pools.insert(key, pool);
        }

        Ok(Self {
            pools,
            statement_timeout_ms: effective_statement_timeout_ms(
                database.statement_timeout_seconds,
                database.run_timeout(),
            ),
        })
    }

    fn pool(&self, segment: &SegmentCode) -> Result<&Pool> {
        self.pools.get(&segment.lookup_key()).ok_or_else(|| {
            InvexError::Connection(format!("No database configured for segment '{segment}'"))
        })
    }

    async fn connect(&self, segment: &SegmentCode) -> Result<deadpool_postgres::Object> {
        let client = self.pool(segment)?.get().await.map_err(|e| {
            InvexError::Connection(format!(
                "Failed to get connection for segment '{segment}': {e}"
            ))
        })?;

        client
            .batch_execute(&format!(
                "SET statement_timeout = {}",
                self.statement_timeout_ms
            ))
            .await
            .map_err(|e| {
                InvexError::Connection(format!("Failed to set statement timeout: {e}"))
            })?;

        Ok(client)
    }
}

#[async_trait]
impl SessionProvider for PostgresSessionProvider {
    async fn acquire(&self, segment: &SegmentCode) -> Result<Box<dyn ExtractionSession>> {
        let client = self.connect(segment).await?;
        tracing::debug!(segment = %segment, "Database session acquired");
        Ok(Box::new(PostgresSession::new(client)))
    }

    async fn test_connection(&self, segment: &SegmentCode) -> Result<()> {
        let client = self.connect(segment).await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| InvexError::Connection(format!("Connection test failed: {e}")))?;

        tracing::info!(segment = %segment, "PostgreSQL connection test successful");
        Ok(())
    }

    fn segments(&self) -> Vec<String> {
        self.pools.keys().cloned().collect()
    }
}

fn build_pool(code: &str, segment: &SegmentConfig, database: &DatabaseConfig) -> Result<Pool> {
    let pg_config: tokio_postgres::Config =
        segment.connection_string.expose_secret().parse().map_err(|e| {
            InvexError::Configuration(format!(
                "Invalid connection string for segment '{code}': {e}"
            ))
        })?;

    let manager = Manager::from_config(
        pg_config,
        NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );

    let timeout = Some(Duration::from_secs(database.connection_timeout_seconds));
    Pool::builder(manager)
        .max_size(database.max_connections)
        .wait_timeout(timeout)
        .create_timeout(timeout)
        .recycle_timeout(timeout)
        .runtime(deadpool_postgres::Runtime::Tokio1)
        .build()
        .map_err(|e| {
            InvexError::Configuration(format!(
                "Failed to create connection pool for segment '{code}': {e}"
            ))
        })
}

/// Server-side timeout for each statement of a session
///
/// The run deadline, when shorter, caps the configured statement timeout.
/// The result never exceeds what the server accepts.
fn effective_statement_timeout_ms(statement_timeout_seconds: u64, run_timeout: Option<Duration>) -> u64 {
    let statement_ms = statement_timeout_seconds.saturating_mul(1000);
    let effective = match run_timeout {
        Some(run) => {
            let run_ms = u64::try_from(run.as_millis()).unwrap_or(u64::MAX);
            if statement_ms == 0 {
                run_ms
            } else {
                statement_ms.min(run_ms)
            }
        }
        None => statement_ms,
    };
    effective.min(MAX_STATEMENT_TIMEOUT_MS)
}
