//! Router fixtures shared by the handler tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;

use fingerprint_core::{CaptureProfile, FingerprintRecord, NewFingerprint};

use crate::config::CollectorConfig;
use crate::db::{FingerprintStore, MemoryFingerprintStore, RepositoryError};
use crate::routes;
use crate::state::AppState;

pub const VIEW_TOKEN: &str = "k9F!vQ2#zL7@wR4$hT1%";

/// Detail carried by every [`FailingStore`] error.
pub const STORE_FAILURE: &str = "relation \"fingerprints\" does not exist";

/// Store whose every call fails as if the database were unusable.
struct FailingStore;

#[async_trait]
impl FingerprintStore for FailingStore {
    async fn insert(&self, _: NewFingerprint) -> Result<FingerprintRecord, RepositoryError> {
        Err(sqlx::Error::Protocol(STORE_FAILURE.to_string()).into())
    }

    async fn list_recent(&self) -> Result<Vec<FingerprintRecord>, RepositoryError> {
        Err(sqlx::Error::Protocol(STORE_FAILURE.to_string()).into())
    }
}

fn config(profile: CaptureProfile) -> CollectorConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("FINGERPRINT_STORE", "memory".to_string()),
        ("FINGERPRINT_VIEW_TOKEN", VIEW_TOKEN.to_string()),
        ("FINGERPRINT_CAPTURE_PROFILE", profile.to_string()),
    ]);
    CollectorConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("test configuration is valid")
}

/// Router backed by a fresh in-memory store, extended capture profile.
pub fn memory_app() -> (Router, Arc<MemoryFingerprintStore>) {
    memory_app_with(CaptureProfile::Extended)
}

/// Router backed by a fresh in-memory store with the given capture profile.
pub fn memory_app_with(profile: CaptureProfile) -> (Router, Arc<MemoryFingerprintStore>) {
    let store = Arc::new(MemoryFingerprintStore::new());
    let state = AppState::new(config(profile), store.clone());
    (routes::app(state), store)
}

/// Router whose store rejects every insert and query.
pub fn failing_app() -> Router {
    routes::app(AppState::new(
        config(CaptureProfile::Extended),
        Arc::new(FailingStore),
    ))
}
