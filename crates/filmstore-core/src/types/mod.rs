/// Type definitions for the filmstore system
///
/// This module contains all type definitions organized by category.

/// Identifier types
pub mod ids;
/// System-wide error types
pub mod error;
/// Field extraction and link-shape normalization helpers
pub mod parse;
/// Actor record and codec
pub mod actor;
/// Film record and codec
pub mod film;
/// Review record and codec
pub mod review;

/// Document identifier
pub type DocId = ids::DocId;

/// The stored representation of an entity: a JSON object keyed by field
/// name, with the identity held under `_id`.
pub type Document = serde_json::Map<String, serde_json::Value>;

// Re-export commonly used types for convenience
pub use actor::Actor;
pub use error::{CatalogError, CatalogResult};
pub use film::Film;
pub use review::Review;
