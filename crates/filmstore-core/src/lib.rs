//! # Filmstore Core
//!
//! Core types and logic for the filmstore catalog: identifiers, entity
//! records with their document codecs, the document store abstraction
//! with its in-memory backend, and the referential-integrity engine that
//! keeps the denormalized film↔actor and film↔review links consistent.

#![warn(missing_docs)]

/// Core application logic: configuration, state, factory, logging
pub mod core;

/// Type definitions for all data structures
pub mod types;

/// System constants
pub mod constants;

/// Document store abstraction and backends
pub mod store;

/// Referential integrity engine
pub mod links;

// Re-export commonly used items
pub use links::LinkEngine;
pub use store::{DocumentStore, Filter, MemoryStore, Patch, StoreImpl};
pub use types::{Actor, CatalogError, CatalogResult, DocId, Document, Film, Review};
