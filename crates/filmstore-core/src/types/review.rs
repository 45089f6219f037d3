//! Review record and its document codec

use serde_json::Value;

use crate::types::error::CatalogResult;
use crate::types::parse::{optional_str, required_id, required_str};
use crate::types::{DocId, Document};

/// A reviewer's write-up of one film.
///
/// A review belongs to exactly one film for its whole lifetime; the film
/// holds the back-reference in its `reviews` list. The author is an
/// externally owned profile, referenced by id only.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    /// Store identity; `None` until the store has generated one
    pub id: Option<DocId>,
    /// The reviewed film
    pub film_id: DocId,
    /// The authoring profile (external collaborator)
    pub profile_id: DocId,
    /// Review body
    pub text: String,
    /// Optional display nickname shown instead of the profile
    pub nickname: Option<String>,
}

impl Review {
    /// Decode a stored document into a record.
    pub fn decode(doc: &Document) -> CatalogResult<Self> {
        Ok(Review {
            id: match doc.get(crate::constants::ID_FIELD) {
                Some(Value::String(s)) => Some(s.parse()?),
                _ => None,
            },
            film_id: required_id(doc, "film_id")?,
            profile_id: required_id(doc, "profile_id")?,
            text: required_str(doc, "text")?,
            nickname: optional_str(doc, "nickname"),
        })
    }

    /// Encode a record into the canonical stored document shape.
    pub fn encode(&self) -> Document {
        let mut doc = Document::new();
        if let Some(id) = self.id {
            doc.insert(crate::constants::ID_FIELD.into(), Value::String(id.to_string()));
        }
        doc.insert("film_id".into(), Value::String(self.film_id.to_string()));
        doc.insert("profile_id".into(), Value::String(self.profile_id.to_string()));
        doc.insert("text".into(), Value::String(self.text.clone()));
        if let Some(nickname) = &self.nickname {
            doc.insert("nickname".into(), Value::String(nickname.clone()));
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::error::CatalogError;
    use serde_json::json;

    fn sample_doc() -> Document {
        json!({
            "_id": DocId::generate().to_string(),
            "film_id": DocId::generate().to_string(),
            "profile_id": DocId::generate().to_string(),
            "text": "Great movie!",
            "nickname": "moviebuff",
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn decode_then_encode_is_identity() {
        let doc = sample_doc();
        let review = Review::decode(&doc).unwrap();
        assert_eq!(review.encode(), doc);
    }

    #[test]
    fn nickname_is_optional() {
        let mut doc = sample_doc();
        doc.remove("nickname");
        let review = Review::decode(&doc).unwrap();
        assert!(review.nickname.is_none());
        assert_eq!(review.encode(), doc);
    }

    #[test]
    fn decode_requires_text() {
        let mut doc = sample_doc();
        doc.remove("text");
        assert!(matches!(
            Review::decode(&doc),
            Err(CatalogError::MissingField("text"))
        ));
    }

    #[test]
    fn decode_rejects_malformed_film_reference() {
        let mut doc = sample_doc();
        doc.insert("film_id".into(), json!("nope"));
        assert!(matches!(
            Review::decode(&doc),
            Err(CatalogError::InvalidIdentifier(_))
        ));
    }
}
