//! Document store adapter for the filmstore catalog
//!
//! This module provides the storage abstraction that keeps route handlers
//! and the link engine independent of a concrete backend. The contract is
//! deliberately narrow: named collections of JSON documents, addressed by
//! generated identity, with the three patch operators the catalog needs.

use serde_json::Value;

use crate::constants::ID_FIELD;
use crate::types::{CatalogResult, DocId, Document};

/// In-memory backend
pub mod memory;

pub use memory::MemoryStore;

/// A predicate selecting documents within one collection.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Every document
    All,
    /// The document whose `_id` equals the given identity
    Id(DocId),
    /// Documents whose field equals the given value
    Eq(&'static str, Value),
    /// Documents whose array field contains the given value
    Contains(&'static str, Value),
}

impl Filter {
    /// Does `doc` satisfy this filter?
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(id) => {
                doc.get(ID_FIELD).and_then(Value::as_str) == Some(id.as_str())
            }
            Filter::Eq(field, value) => doc.get(*field) == Some(value),
            Filter::Contains(field, value) => doc
                .get(*field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
        }
    }
}

/// A single mutation applied to one document.
///
/// These mirror the operators the catalog's write paths need: field merge,
/// dedup append for back-reference lists, and element removal.
#[derive(Debug, Clone)]
pub enum Patch {
    /// Merge-set: every supplied field overwrites, absent fields persist
    Set(Document),
    /// Append to an array field unless an equal element is already present
    AddToSet(&'static str, Value),
    /// Remove every equal element from an array field
    Pull(&'static str, Value),
}

impl Patch {
    /// Apply this patch to a document in place.
    pub fn apply(&self, doc: &mut Document) {
        match self {
            Patch::Set(fields) => {
                for (key, value) in fields {
                    // Identity is immutable once assigned.
                    if key.as_str() == ID_FIELD {
                        continue;
                    }
                    doc.insert(key.clone(), value.clone());
                }
            }
            Patch::AddToSet(field, value) => {
                let entry = doc
                    .entry(field.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(items) = entry {
                    if !items.contains(value) {
                        items.push(value.clone());
                    }
                }
            }
            Patch::Pull(field, value) => {
                if let Some(Value::Array(items)) = doc.get_mut(*field) {
                    items.retain(|item| item != value);
                }
            }
        }
    }
}

/// Trait for document store implementations
pub trait DocumentStore: Send + Sync {
    /// Find every document matching the filter, ordered by identity
    /// (identities sort by creation time).
    fn find(&self, collection: &str, filter: &Filter) -> CatalogResult<Vec<Document>>;

    /// Find the first document matching the filter.
    fn find_one(&self, collection: &str, filter: &Filter) -> CatalogResult<Option<Document>>;

    /// Insert one document, generating its identity when `_id` is absent.
    /// Returns the identity under which it was stored.
    fn insert_one(&self, collection: &str, doc: Document) -> CatalogResult<DocId>;

    /// Insert a batch of documents; identities are returned in input order.
    fn insert_many(&self, collection: &str, docs: Vec<Document>) -> CatalogResult<Vec<DocId>> {
        docs.into_iter()
            .map(|doc| self.insert_one(collection, doc))
            .collect()
    }

    /// Apply a patch to the first matching document. Returns the document
    /// after the update, or `None` when nothing matched.
    fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &Patch,
    ) -> CatalogResult<Option<Document>>;

    /// Remove the first matching document. Returns the number removed.
    fn delete_one(&self, collection: &str, filter: &Filter) -> CatalogResult<u64>;
}

/// Helper trait that combines all requirements for injectable store
/// implementations; cleans up generic bounds throughout the codebase.
pub trait StoreImpl: DocumentStore + 'static {}

/// Blanket implementation for any type that meets the requirements
impl<T> StoreImpl for T where T: DocumentStore + 'static {}
