/// Module containing the fixed-size document identifier type. Uses base62
/// encoding [0-9a-zA-Z] for a human-readable string representation while
/// maintaining a fixed memory layout for cheap comparison and hashing.

use std::fmt;
use std::str::FromStr;
use rand::{rng, Rng};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{BASE62_CHARS, DOC_ID_LENGTH, DOC_ID_TIME_LENGTH};
use crate::types::error::CatalogError;

/// Fixed-size 16-byte document identifier.
///
/// The first 8 characters are a base62-encoded millisecond timestamp
/// (most significant digit first), so lexicographic order of identifiers
/// follows creation order. The remaining 8 characters are random.
///
/// Memory Layout:
/// - [u8; 16] - Fixed array of base62 bytes
///
/// The #[repr(transparent)] ensures the struct has the same ABI as the
/// underlying array.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocId([u8; DOC_ID_LENGTH]);

impl DocId {
    /// Generate a new identifier for the current instant.
    ///
    /// Two identifiers generated in the same millisecond differ in their
    /// random suffix; ordering between them is arbitrary but stable.
    pub fn generate() -> Self {
        Self::generate_at(chrono::Utc::now().timestamp_millis())
    }

    /// Generate an identifier with an explicit millisecond timestamp.
    pub fn generate_at(millis: i64) -> Self {
        let mut bytes = [0u8; DOC_ID_LENGTH];

        // Base62 timestamp prefix, most significant digit first.
        let mut rem = millis.max(0) as u64;
        for i in (0..DOC_ID_TIME_LENGTH).rev() {
            bytes[i] = BASE62_CHARS[(rem % 62) as usize];
            rem /= 62;
        }

        let mut rng = rng();
        for byte in bytes.iter_mut().skip(DOC_ID_TIME_LENGTH) {
            *byte = BASE62_CHARS[rng.random_range(0..BASE62_CHARS.len())];
        }

        DocId(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; DOC_ID_LENGTH] {
        &self.0
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &str {
        // Safety: construction only ever stores BASE62_CHARS bytes
        unsafe { std::str::from_utf8_unchecked(&self.0) }
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != DOC_ID_LENGTH {
            return Err(CatalogError::InvalidIdentifier(s.to_string()));
        }
        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(CatalogError::InvalidIdentifier(s.to_string()));
        }

        let mut bytes = [0u8; DOC_ID_LENGTH];
        bytes.copy_from_slice(s.as_bytes());
        Ok(DocId(bytes))
    }
}

// Identifiers cross the wire as plain strings, not byte arrays.
impl Serialize for DocId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DocId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
