//! Shared application state.

use crate::session::SessionStore;
use giveaway_core::AppConfig;
use giveaway_store::RegistrantStore;
use std::sync::Arc;

/// State shared by all handlers. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration constructed once at startup; never read from ambient
    /// globals mid-request.
    config: AppConfig,
    store: RegistrantStore,
    sessions: SessionStore,
}

impl AppState {
    pub fn new(config: AppConfig, store: RegistrantStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                sessions: SessionStore::new(),
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &RegistrantStore {
        &self.inner.store
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }
}
