// In-memory document store
//
// Same contract as the SQLite store, without a database file. Handlers are
// exercised against it in tests.

use super::{Document, DocumentStore, Filter, StorageError, StorageResult, INTERNAL_ID_FIELD};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::RwLock;

pub struct InMemoryDocumentStore {
    database: String,
    /// collection -> documents in insertion order
    collections: RwLock<BTreeMap<String, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new(database: impl Into<String>) -> Self {
        InMemoryDocumentStore {
            database: database.into(),
            collections: RwLock::new(BTreeMap::new()),
        }
    }

    /// Total documents across all collections
    pub fn len(&self) -> usize {
        self.collections
            .read()
            .map(|guard| guard.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn database_name(&self) -> &str {
        &self.database
    }

    fn insert(&self, collection: &str, mut document: Document) -> StorageResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        document.insert(INTERNAL_ID_FIELD.to_string(), Value::String(id.clone()));

        let mut collections = self.collections.write().map_err(|_| StorageError::Poisoned)?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);

        Ok(id)
    }

    fn find(&self, collection: &str, filter: &Filter, limit: usize) -> StorageResult<Vec<Document>> {
        let collections = self.collections.read().map_err(|_| StorageError::Poisoned)?;

        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|d| filter.matches(d))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn find_by_id(&self, collection: &str, id: &str) -> StorageResult<Option<Document>> {
        let collections = self.collections.read().map_err(|_| StorageError::Poisoned)?;

        Ok(collections.get(collection).and_then(|documents| {
            documents
                .iter()
                .find(|d| d.get(INTERNAL_ID_FIELD).and_then(Value::as_str) == Some(id))
                .cloned()
        }))
    }

    fn list_collection_names(&self) -> StorageResult<Vec<String>> {
        let collections = self.collections.read().map_err(|_| StorageError::Poisoned)?;
        Ok(collections.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test document must be an object"),
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = InMemoryDocumentStore::new("game");
        assert!(store.is_empty());
        assert_eq!(store.database_name(), "game");
    }

    #[test]
    fn test_insert_assigns_unique_ids() {
        let store = InMemoryDocumentStore::new("game");

        let a = store.insert("player", doc(json!({"name": "A"}))).unwrap();
        let b = store.insert("player", doc(json!({"name": "A"}))).unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_insert_overrides_client_id() {
        let store = InMemoryDocumentStore::new("game");

        let id = store.insert("player", doc(json!({"_id": "forged"}))).unwrap();
        assert_ne!(id, "forged");
        assert!(store.find_by_id("player", "forged").unwrap().is_none());
        assert!(store.find_by_id("player", &id).unwrap().is_some());
    }

    #[test]
    fn test_find_filters_and_limits_in_order() {
        let store = InMemoryDocumentStore::new("game");
        for (name, profession) in [("A", "Chef"), ("B", "Pilot"), ("C", "Chef"), ("D", "Chef")] {
            store
                .insert("player", doc(json!({"name": name, "profession": profession})))
                .unwrap();
        }

        let chefs = store
            .find("player", &Filter::new().eq("profession", "Chef"), 2)
            .unwrap();
        let names: Vec<&str> = chefs.iter().filter_map(|d| d["name"].as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);

        assert!(store.find("player", &Filter::new(), 0).unwrap().is_empty());
        assert!(store.find("missing", &Filter::new(), 10).unwrap().is_empty());
    }

    #[test]
    fn test_collections_are_independent() {
        let store = InMemoryDocumentStore::new("game");
        store.insert("player", doc(json!({"name": "A"}))).unwrap();
        store.insert("audit", doc(json!({"kind": "login"}))).unwrap();

        assert_eq!(store.find("player", &Filter::new(), 10).unwrap().len(), 1);
        assert_eq!(
            store.list_collection_names().unwrap(),
            vec!["audit".to_string(), "player".to_string()]
        );
    }
}
