//! In-memory document store backed by DashMap
//!
//! Collections and documents live in concurrent maps; documents are plain
//! JSON objects. This backend serves the POC deployment and doubles as the
//! substitute store in tests, which is why the adapter is injected rather
//! than held as a global.

use dashmap::DashMap;
use serde_json::Value;

use crate::constants::ID_FIELD;
use crate::store::{DocumentStore, Filter, Patch};
use crate::types::{CatalogError, CatalogResult, DocId, Document};

/// Concurrent in-memory store: collection name → (identity → document).
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, DashMap<DocId, Document>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    fn matching_id(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Option<DocId> {
        // Fast path: identity lookups skip the scan.
        if let Filter::Id(id) = filter {
            let docs = self.collections.get(collection)?;
            return docs.contains_key(id).then_some(*id);
        }

        let docs = self.collections.get(collection)?;
        let mut hit: Option<DocId> = None;
        for entry in docs.iter() {
            if filter.matches(entry.value()) {
                // "First" means lowest identity, so scans are deterministic.
                match hit {
                    Some(existing) if existing <= *entry.key() => {}
                    _ => hit = Some(*entry.key()),
                }
            }
        }
        hit
    }
}

impl DocumentStore for MemoryStore {
    fn find(&self, collection: &str, filter: &Filter) -> CatalogResult<Vec<Document>> {
        let mut results: Vec<Document> = match self.collections.get(collection) {
            Some(docs) => docs
                .iter()
                .filter(|entry| filter.matches(entry.value()))
                .map(|entry| entry.value().clone())
                .collect(),
            None => Vec::new(),
        };
        results.sort_by(|a, b| {
            let a = a.get(ID_FIELD).and_then(Value::as_str).unwrap_or("");
            let b = b.get(ID_FIELD).and_then(Value::as_str).unwrap_or("");
            a.cmp(b)
        });
        Ok(results)
    }

    fn find_one(&self, collection: &str, filter: &Filter) -> CatalogResult<Option<Document>> {
        let Some(id) = self.matching_id(collection, filter) else {
            return Ok(None);
        };
        let docs = self
            .collections
            .get(collection)
            .ok_or_else(|| CatalogError::Store(format!("collection '{}' vanished", collection)))?;
        Ok(docs.get(&id).map(|doc| doc.value().clone()))
    }

    fn insert_one(&self, collection: &str, mut doc: Document) -> CatalogResult<DocId> {
        let id = match doc.get(ID_FIELD).and_then(Value::as_str) {
            Some(raw) => raw.parse()?,
            None => DocId::generate(),
        };
        doc.insert(ID_FIELD.into(), Value::String(id.to_string()));

        let docs = self.collections.entry(collection.to_string()).or_default();
        if docs.contains_key(&id) {
            return Err(CatalogError::Store(format!(
                "document {} already exists in '{}'",
                id, collection
            )));
        }
        docs.insert(id, doc);
        Ok(id)
    }

    fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &Patch,
    ) -> CatalogResult<Option<Document>> {
        let Some(id) = self.matching_id(collection, filter) else {
            return Ok(None);
        };
        let docs = self
            .collections
            .get(collection)
            .ok_or_else(|| CatalogError::Store(format!("collection '{}' vanished", collection)))?;
        let result = match docs.get_mut(&id) {
            Some(mut entry) => {
                patch.apply(entry.value_mut());
                Ok(Some(entry.value().clone()))
            }
            // Lost a race with a concurrent delete; report "no match".
            None => Ok(None),
        };
        result
    }

    fn delete_one(&self, collection: &str, filter: &Filter) -> CatalogResult<u64> {
        let Some(id) = self.matching_id(collection, filter) else {
            return Ok(0);
        };
        let removed = self
            .collections
            .get(collection)
            .and_then(|docs| docs.remove(&id));
        Ok(removed.map_or(0, |_| 1))
    }
}
