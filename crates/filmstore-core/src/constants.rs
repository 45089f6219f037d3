//! Global constants used throughout the filmstore codebase
//!
//! This module contains compile-time constants that are shared across
//! multiple modules to ensure consistency and avoid magic numbers.

/// Base62 character set used for human-readable IDs
///
/// This character set provides 62 possible characters (0-9, a-z, A-Z)
/// for generating human-readable identifiers while keeping a fixed
/// byte layout for cheap comparison.
pub const BASE62_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of a document identifier in bytes (16 characters)
///
/// The first [`DOC_ID_TIME_LENGTH`] characters encode a millisecond
/// timestamp so identifiers sort by creation time; the rest is random.
pub const DOC_ID_LENGTH: usize = 16;

/// Number of leading DocId characters holding the base62 timestamp
pub const DOC_ID_TIME_LENGTH: usize = 8;

/// Document key field, as the store persists it
pub const ID_FIELD: &str = "_id";

/// Collection holding actor documents
pub const ACTORS: &str = "actors";

/// Collection holding film documents
pub const FILMS: &str = "films";

/// Collection holding review documents
pub const REVIEWS: &str = "reviews";

/// Collection holding reviewer profiles (owned by the profile service,
/// read here only for existence checks)
pub const PROFILES: &str = "profiles";
