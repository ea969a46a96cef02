//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::CollectorConfig;
use crate::db::FingerprintStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the fingerprint store. Neither is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CollectorConfig,
    store: Arc<dyn FingerprintStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Collector configuration
    /// * `store` - Backing store for fingerprint records
    #[must_use]
    pub fn new(config: CollectorConfig, store: Arc<dyn FingerprintStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the collector configuration.
    #[must_use]
    pub fn config(&self) -> &CollectorConfig {
        &self.inner.config
    }

    /// Get a reference to the fingerprint store.
    #[must_use]
    pub fn store(&self) -> &dyn FingerprintStore {
        self.inner.store.as_ref()
    }
}
