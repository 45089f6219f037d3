//! Film record and its document codec

use serde_json::Value;

use crate::types::error::CatalogResult;
use crate::types::parse::{id_list, id_list_value, optional_str, required_f64, required_i64, required_str};
use crate::types::{DocId, Document};

/// A film with its details and denormalized link collections.
///
/// Once persisted, `actors` holds resolved actor identities, never raw
/// surnames; surname resolution happens before the document is written.
#[derive(Debug, Clone, PartialEq)]
pub struct Film {
    /// Store identity; `None` until the store has generated one
    pub id: Option<DocId>,
    /// Title
    pub title: String,
    /// Resolved actor identities
    pub actors: Vec<DocId>,
    /// Year of release
    pub release_year: i64,
    /// Genre, free text
    pub genre: String,
    /// Numeric rating
    pub rating: f64,
    /// Description, free text
    pub description: String,
    /// Main image reference
    pub image_path: String,
    /// Optional trailer reference
    pub trailer_path: Option<String>,
    /// Back-references to reviews of this film
    pub reviews: Vec<DocId>,
}

impl Film {
    /// Decode a stored document into a record.
    ///
    /// Fails with `MissingField` when any of title, actors, release_year,
    /// genre, rating, description or image_path is absent. Both link
    /// fields are normalized from either legacy shape.
    pub fn decode(doc: &Document) -> CatalogResult<Self> {
        // `actors` must be present, even if empty; an absent key is a
        // validation failure while `[]` is a film with no matched cast.
        if !doc.contains_key("actors") {
            return Err(crate::types::error::CatalogError::MissingField("actors"));
        }

        Ok(Film {
            id: match doc.get(crate::constants::ID_FIELD) {
                Some(Value::String(s)) => Some(s.parse()?),
                _ => None,
            },
            title: required_str(doc, "title")?,
            actors: id_list(doc, "actors")?,
            release_year: required_i64(doc, "release_year")?,
            genre: required_str(doc, "genre")?,
            rating: required_f64(doc, "rating")?,
            description: required_str(doc, "description")?,
            image_path: required_str(doc, "image_path")?,
            trailer_path: optional_str(doc, "trailer_path"),
            reviews: id_list(doc, "reviews")?,
        })
    }

    /// Encode a record into the canonical stored document shape.
    pub fn encode(&self) -> Document {
        let mut doc = Document::new();
        if let Some(id) = self.id {
            doc.insert(crate::constants::ID_FIELD.into(), Value::String(id.to_string()));
        }
        doc.insert("title".into(), Value::String(self.title.clone()));
        doc.insert("actors".into(), id_list_value(&self.actors));
        doc.insert("release_year".into(), Value::from(self.release_year));
        doc.insert("genre".into(), Value::String(self.genre.clone()));
        doc.insert("rating".into(), Value::from(self.rating));
        doc.insert("description".into(), Value::String(self.description.clone()));
        doc.insert("image_path".into(), Value::String(self.image_path.clone()));
        if let Some(trailer) = &self.trailer_path {
            doc.insert("trailer_path".into(), Value::String(trailer.clone()));
        }
        doc.insert("reviews".into(), id_list_value(&self.reviews));
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
            "title": "Cast Away",
            "actors": [DocId::generate().to_string()],
            "release_year": 2000,
            "genre": "Drama",
            "rating": 7.8,
            "description": "A FedEx executive is stranded on an island.",
            "image_path": "/images/cast_away.jpg",
            "trailer_path": "/trailers/cast_away.mp4",
            "reviews": [],
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn decode_then_encode_is_identity() {
        let doc = sample_doc();
        let film = Film::decode(&doc).unwrap();
        assert_eq!(film.encode(), doc);
    }

    #[test]
    fn trailer_is_optional() {
        let mut doc = sample_doc();
        doc.remove("trailer_path");
        let film = Film::decode(&doc).unwrap();
        assert!(film.trailer_path.is_none());
        assert_eq!(film.encode(), doc);
    }

    #[test]
    fn decode_requires_every_semantic_field() {
        for field in ["title", "actors", "release_year", "genre", "rating", "description", "image_path"] {
            let mut doc = sample_doc();
            doc.remove(field);
            assert!(
                matches!(Film::decode(&doc), Err(CatalogError::MissingField(f)) if f == field),
                "expected MissingField for {}",
                field
            );
        }
    }

    #[test]
    fn integer_ratings_are_accepted() {
        let mut doc = sample_doc();
        doc.insert("rating".into(), json!(8));
        assert_eq!(Film::decode(&doc).unwrap().rating, 8.0);
    }
}
