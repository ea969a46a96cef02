//! `PostgreSQL` fingerprint repository.
//!
//! Queries are checked at runtime with `query_as` and decoded straight into
//! [`FingerprintRecord`] through its `FromRow` derive.

use async_trait::async_trait;
use sqlx::PgPool;

use fingerprint_core::{FingerprintRecord, NewFingerprint};

use super::{FingerprintStore, RepositoryError};

/// Repository for the `fingerprints` table.
#[derive(Debug, Clone)]
pub struct PgFingerprintStore {
    pool: PgPool,
}

impl PgFingerprintStore {
    /// Create a new fingerprint repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl FingerprintStore for PgFingerprintStore {
    async fn insert(&self, fingerprint: NewFingerprint) -> Result<FingerprintRecord, RepositoryError> {
        let record = sqlx::query_as::<_, FingerprintRecord>(
            r#"
            INSERT INTO fingerprints
                (user_agent, platform, language, screen_width, screen_height, timezone, referrer, ip)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_agent, platform, language, screen_width, screen_height,
                      timezone, referrer, ip, "timestamp"
            "#,
        )
        .bind(fingerprint.user_agent)
        .bind(fingerprint.platform)
        .bind(fingerprint.language)
        .bind(fingerprint.screen_width)
        .bind(fingerprint.screen_height)
        .bind(fingerprint.timezone)
        .bind(fingerprint.referrer)
        .bind(fingerprint.ip)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_recent(&self) -> Result<Vec<FingerprintRecord>, RepositoryError> {
        let records = sqlx::query_as::<_, FingerprintRecord>(
            r#"
            SELECT id, user_agent, platform, language, screen_width, screen_height,
                   timezone, referrer, ip, "timestamp"
            FROM fingerprints
            ORDER BY "timestamp" DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
