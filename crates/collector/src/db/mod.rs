//! Persistence for fingerprint records.
//!
//! # Database
//!
//! A single table, `fingerprints`, holds every submission. Rows are never
//! updated or deleted; `id` and `timestamp` are assigned by the database.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/collector/migrations/` and run via:
//! ```bash
//! cargo run -p fingerprint-cli -- migrate
//! ```
//!
//! Handlers talk to a [`FingerprintStore`], so the service can run against
//! `PostgreSQL` ([`PgFingerprintStore`]) or an in-process store
//! ([`MemoryFingerprintStore`]) used by tests and local runs.

pub mod fingerprints;
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use fingerprint_core::{FingerprintRecord, NewFingerprint};

pub use fingerprints::PgFingerprintStore;
pub use memory::MemoryFingerprintStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Storage for fingerprint records.
///
/// Each method maps to exactly one statement against the backing store.
#[async_trait]
pub trait FingerprintStore: Send + Sync {
    /// Insert a record and return it with its store-assigned `id` and `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the insert fails.
    async fn insert(&self, fingerprint: NewFingerprint) -> Result<FingerprintRecord, RepositoryError>;

    /// Every stored record, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn list_recent(&self) -> Result<Vec<FingerprintRecord>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
