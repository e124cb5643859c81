// Shared application state, injected into every handler

use crate::config::Config;
use crate::db::{DocumentStore, StorageError};
use crate::schema::SchemaValidator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Opened once at startup; `None` when no database is configured
    pub store: Option<Arc<dyn DocumentStore>>,
    pub validator: Arc<SchemaValidator>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn DocumentStore>>, config: Config) -> Self {
        AppState {
            store,
            validator: Arc::new(SchemaValidator::new()),
            config: Arc::new(config),
        }
    }

    /// State backed by an explicit store (in-memory in tests)
    pub fn with_store(store: impl DocumentStore + 'static) -> Self {
        Self::new(Some(Arc::new(store)), Config::default())
    }

    /// The store, or `StorageError::Unavailable` when none is configured
    pub fn store(&self) -> Result<&dyn DocumentStore, StorageError> {
        self.store.as_deref().ok_or_else(|| {
            StorageError::Unavailable("DATABASE_URL and DATABASE_NAME must be set".to_string())
        })
    }
}
