//! Actor record and its document codec

use serde_json::Value;

use crate::types::error::CatalogResult;
use crate::types::parse::{id_list, id_list_value, required_str};
use crate::types::{DocId, Document};

/// An actor with personal details and the films they appear in.
///
/// `surname` doubles as a natural secondary key: no two actors may share
/// one, and film payloads reference actors by surname.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// Store identity; `None` until the store has generated one
    pub id: Option<DocId>,
    /// First name
    pub name: String,
    /// Last name, unique across the collection
    pub surname: String,
    /// Date of birth, `YYYY-MM-DD`
    pub date_of_birth: String,
    /// Back-references to films this actor appears in
    pub films: Vec<DocId>,
}

impl Actor {
    /// Decode a stored document into a record.
    ///
    /// Fails with `MissingField` when name, surname or date_of_birth is
    /// absent. The `films` link field is normalized from either legacy
    /// shape (array or comma-joined string).
    pub fn decode(doc: &Document) -> CatalogResult<Self> {
        Ok(Actor {
            id: match doc.get(crate::constants::ID_FIELD) {
                Some(Value::String(s)) => Some(s.parse()?),
                _ => None,
            },
            name: required_str(doc, "name")?,
            surname: required_str(doc, "surname")?,
            date_of_birth: required_str(doc, "date_of_birth")?,
            films: id_list(doc, "films")?,
        })
    }

    /// Encode a record into the canonical stored document shape.
    ///
    /// Omits `_id` when no identity has been assigned so the store can
    /// generate one.
    pub fn encode(&self) -> Document {
        let mut doc = Document::new();
        if let Some(id) = self.id {
            doc.insert(crate::constants::ID_FIELD.into(), Value::String(id.to_string()));
        }
        doc.insert("name".into(), Value::String(self.name.clone()));
        doc.insert("surname".into(), Value::String(self.surname.clone()));
        doc.insert(
            "date_of_birth".into(),
            Value::String(self.date_of_birth.clone()),
        );
        doc.insert("films".into(), id_list_value(&self.films));
        doc
    }
}
