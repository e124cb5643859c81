// 🗄️ Document Access Layer
// Named collections of JSON documents behind a swappable store

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryDocumentStore;
pub use sqlite::SqliteDocumentStore;

use crate::config::Config;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// A stored document: a JSON object
pub type Document = Map<String, Value>;

/// Internal identifier field as held by the store
pub const INTERNAL_ID_FIELD: &str = "_id";

/// Identifier field exposed to API clients
pub const PUBLIC_ID_FIELD: &str = "id";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum StorageError {
    /// No store was configured or it failed to open at startup
    #[error("database unavailable: {0}")]
    Unavailable(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Query(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

// ============================================================================
// FILTER
// ============================================================================

/// Equality predicate over top-level document fields.
///
/// All conditions must hold. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: require `field == value`
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|(field, expected)| {
            document
                .get(field)
                .map(|actual| values_equal(actual, expected))
                .unwrap_or(false)
        })
    }
}

// 5000 and 5000.0 are the same number
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

// ============================================================================
// STORE TRAIT
// ============================================================================

/// A document database holding named collections.
///
/// Documents returned by `find`/`find_by_id` carry the internal `_id` field;
/// the helper functions below translate it for clients.
pub trait DocumentStore: Send + Sync {
    /// Logical database name
    fn database_name(&self) -> &str;

    /// Insert a document and return its newly assigned identifier.
    /// Any `_id` already present on the document is replaced.
    fn insert(&self, collection: &str, document: Document) -> StorageResult<String>;

    /// Up to `limit` matching documents, in insertion order
    fn find(&self, collection: &str, filter: &Filter, limit: usize) -> StorageResult<Vec<Document>>;

    fn find_by_id(&self, collection: &str, id: &str) -> StorageResult<Option<Document>>;

    fn list_collection_names(&self) -> StorageResult<Vec<String>>;
}

// ============================================================================
// ACCESS HELPERS
// ============================================================================

/// Persist a record in `collection`, returning its new identifier
pub fn create_document<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    record: &T,
) -> StorageResult<String> {
    let mut document = match serde_json::to_value(record)? {
        Value::Object(document) => document,
        other => {
            return Err(StorageError::Serialization(format!(
                "expected a JSON object, got {}",
                other
            )))
        }
    };

    let now = Value::String(Utc::now().to_rfc3339());
    document.insert("created_at".to_string(), now.clone());
    document.insert("updated_at".to_string(), now);

    let id = store.insert(collection, document)?;
    tracing::debug!(collection, %id, "document created");

    Ok(id)
}

/// Fetch up to `limit` documents with their identifier exposed as "id"
pub fn get_documents(
    store: &dyn DocumentStore,
    collection: &str,
    filter: &Filter,
    limit: usize,
) -> StorageResult<Vec<Document>> {
    let documents = store.find(collection, filter, limit)?;
    tracing::debug!(collection, count = documents.len(), limit, "documents fetched");

    Ok(documents.into_iter().map(expose_id).collect())
}

/// Fetch a single document by identifier
pub fn get_document(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> StorageResult<Option<Document>> {
    Ok(store.find_by_id(collection, id)?.map(expose_id))
}

/// Replace the internal `_id` with a string `id`
pub fn expose_id(mut document: Document) -> Document {
    if let Some(raw) = document.remove(INTERNAL_ID_FIELD) {
        let id = match raw {
            Value::String(id) => id,
            other => other.to_string(),
        };
        document.insert(PUBLIC_ID_FIELD.to_string(), Value::String(id));
    }
    document
}

/// Open the configured store, if any.
///
/// A missing configuration or a failed open is logged and yields `None`;
/// storage-backed endpoints then report `StorageError::Unavailable`.
pub fn connect(config: &Config) -> Option<Arc<dyn DocumentStore>> {
    let Some((url, name)) = config.database() else {
        tracing::warn!("DATABASE_URL / DATABASE_NAME not set, running without a database");
        return None;
    };

    match SqliteDocumentStore::open(url, name) {
        Ok(store) => {
            tracing::info!(database = name, "✓ Database opened");
            Some(Arc::new(store))
        }
        Err(e) => {
            tracing::error!(error = %e, "❌ Failed to open database, running without it");
            None
        }
    }
}
