//! In-process fingerprint store.
//!
//! Backs the router in tests and in local runs started with
//! `FINGERPRINT_STORE=memory`. Contents are lost when the process exits.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use fingerprint_core::{FingerprintId, FingerprintRecord, NewFingerprint};

use super::{FingerprintStore, RepositoryError};

/// A `Vec`-backed store that assigns ids and timestamps like the database does.
#[derive(Debug, Default)]
pub struct MemoryFingerprintStore {
    records: RwLock<Vec<FingerprintRecord>>,
}

impl MemoryFingerprintStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl FingerprintStore for MemoryFingerprintStore {
    async fn insert(&self, fingerprint: NewFingerprint) -> Result<FingerprintRecord, RepositoryError> {
        let mut records = self.records.write().await;

        let next_id = i64::try_from(records.len())
            .map_err(|e| RepositoryError::DataCorruption(format!("id overflow: {e}")))?
            + 1;

        // Timestamps never go backwards, even if the wall clock does.
        let now = Utc::now();
        let timestamp = records
            .last()
            .map_or(now, |last| now.max(last.timestamp));

        let record = fingerprint.into_record(FingerprintId::new(next_id), timestamp);
        records.push(record.clone());
        drop(records);

        Ok(record)
    }

    async fn list_recent(&self) -> Result<Vec<FingerprintRecord>, RepositoryError> {
        let mut records = self.records.read().await.clone();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(records)
    }
}
