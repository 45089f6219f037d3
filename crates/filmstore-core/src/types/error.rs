//! Error types and handling for the filmstore catalog
//!
//! One taxonomy covers the whole system; HTTP status mapping happens at
//! the handler boundary in the server crate.

use thiserror::Error;

/// Errors produced by codecs, the store adapter and the link engine.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An identifier token was not a well-formed DocId
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// A required input field was absent from the payload
    #[error("missing required field: '{0}'")]
    MissingField(&'static str),

    /// No document matched the lookup
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A natural-key collision (actor surname) on creation
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// The storage backend failed
    #[error("storage failure: {0}")]
    Store(String),
}

/// Convenience alias used throughout the crate
pub type CatalogResult<T> = Result<T, CatalogError>;
