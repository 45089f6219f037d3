//! Film resource handlers
//!
//! Film payloads reference their cast by surname; resolution to actor
//! identities happens here, before anything is persisted, so stored
//! `actors` fields only ever hold ids. Every mutation that touches a
//! cross-collection link goes through the link engine.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

use filmstore_core::{
    constants::{ACTORS, FILMS},
    core::AppState,
    log_info,
    types::parse::id_list_value,
    CatalogError, DocId, Document, Film, Filter, Patch, StoreImpl,
};

use super::{catalog_error, one_or_many, parse_id, ApiError, ApiResponse, CreatedIds, JsonRequest};

/// Fields a PUT may overwrite. `actors` is special-cased (surnames are
/// re-resolved); `reviews` stays engine-owned.
const UPDATABLE_FIELDS: &[&str] = &[
    "title",
    "release_year",
    "genre",
    "rating",
    "description",
    "image_path",
    "trailer_path",
];

/// Pull the surname list out of a film payload.
fn payload_surnames(payload: &Document) -> Result<Vec<String>, ApiError> {
    let Some(Value::Array(items)) = payload.get("actors") else {
        return Err(catalog_error(CatalogError::MissingField("actors")));
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            _ => Err(catalog_error(CatalogError::MissingField("actors"))),
        })
        .collect()
}

/// List every film, normalized through the codec.
pub async fn list_films<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<ApiResponse<Vec<Document>>>, ApiError> {
    let docs = state
        .store
        .find(FILMS, &Filter::All)
        .map_err(catalog_error)?;

    let mut films = Vec::with_capacity(docs.len());
    for doc in &docs {
        films.push(Film::decode(doc).map_err(catalog_error)?.encode());
    }
    Ok(Json(ApiResponse::success(films)))
}

/// Create one film or a batch of them.
///
/// The payload's `actors` field carries surnames; each is resolved to an
/// actor identity by exact match, and surnames with no match are dropped
/// without failing the request. The whole batch is validated before any
/// insert, then every resolved actor gains the new film id in its
/// back-reference list (deduplicated).
pub async fn create_films<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
    JsonRequest(body): JsonRequest<Value>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedIds>>), ApiError> {
    let payloads = one_or_many(body)?;

    let mut to_insert: Vec<Document> = Vec::with_capacity(payloads.len());
    let mut cast_per_film: Vec<Vec<DocId>> = Vec::with_capacity(payloads.len());

    for payload in &payloads {
        let surnames = payload_surnames(payload)?;
        let resolved = state
            .links
            .resolve_surnames(&surnames)
            .map_err(catalog_error)?;

        let mut normalized = payload.clone();
        normalized.insert("actors".into(), id_list_value(&resolved));

        let mut film = Film::decode(&normalized).map_err(catalog_error)?;
        film.id = None;
        film.reviews = Vec::new();

        to_insert.push(film.encode());
        cast_per_film.push(resolved);
    }

    let ids = state
        .store
        .insert_many(FILMS, to_insert)
        .map_err(catalog_error)?;

    for (film_id, cast) in ids.iter().zip(&cast_per_film) {
        state
            .links
            .attach_film(*film_id, cast)
            .map_err(catalog_error)?;
    }
    log_info!("created {} film(s)", ids.len());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreatedIds {
            ids: ids.iter().map(|id| id.to_string()).collect(),
        })),
    ))
}

/// Fetch one film by id.
pub async fn get_film<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Document>>, ApiError> {
    let film_id = parse_id(&id)?;
    let doc = state
        .store
        .find_one(FILMS, &Filter::Id(film_id))
        .map_err(catalog_error)?
        .ok_or_else(|| catalog_error(CatalogError::NotFound("film")))?;

    let film = Film::decode(&doc).map_err(catalog_error)?;
    Ok(Json(ApiResponse::success(film.encode())))
}

/// Partially update one film.
///
/// When the payload carries an `actors` list it holds surnames, exactly
/// as at creation; they are re-resolved and the actor back-references
/// relinked to match the new cast.
pub async fn update_film<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    JsonRequest(body): JsonRequest<Document>,
) -> Result<Json<ApiResponse<Document>>, ApiError> {
    let film_id = parse_id(&id)?;

    let existing = state
        .store
        .find_one(FILMS, &Filter::Id(film_id))
        .map_err(catalog_error)?
        .ok_or_else(|| catalog_error(CatalogError::NotFound("film")))?;
    let old_film = Film::decode(&existing).map_err(catalog_error)?;

    let mut fields = Document::new();
    for key in UPDATABLE_FIELDS {
        if let Some(value) = body.get(*key) {
            fields.insert((*key).to_string(), value.clone());
        }
    }

    let new_cast = if body.contains_key("actors") {
        let surnames = payload_surnames(&body)?;
        let resolved = state
            .links
            .resolve_surnames(&surnames)
            .map_err(catalog_error)?;
        fields.insert("actors".into(), id_list_value(&resolved));
        Some(resolved)
    } else {
        None
    };

    let updated = state
        .store
        .update_one(FILMS, &Filter::Id(film_id), &Patch::Set(fields))
        .map_err(catalog_error)?
        .ok_or_else(|| catalog_error(CatalogError::NotFound("film")))?;

    if let Some(new_cast) = new_cast {
        state
            .links
            .relink_actors(film_id, &old_film.actors, &new_cast)
            .map_err(catalog_error)?;
    }

    Ok(Json(ApiResponse::success(updated)))
}

/// Delete one film with its full cascade: the id is swept out of every
/// actor's back-reference list and every review of the film is removed.
pub async fn delete_film<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let film_id = parse_id(&id)?;
    let removed = state
        .store
        .delete_one(FILMS, &Filter::Id(film_id))
        .map_err(catalog_error)?;
    if removed == 0 {
        return Err(catalog_error(CatalogError::NotFound("film")));
    }

    state.links.unlink_film(film_id).map_err(catalog_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch the resolved actor documents for one film's cast.
pub async fn get_film_actors<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Document>>>, ApiError> {
    let film_id = parse_id(&id)?;
    let doc = state
        .store
        .find_one(FILMS, &Filter::Id(film_id))
        .map_err(catalog_error)?
        .ok_or_else(|| catalog_error(CatalogError::NotFound("film")))?;
    let film = Film::decode(&doc).map_err(catalog_error)?;

    let mut actors = Vec::with_capacity(film.actors.len());
    for actor_id in &film.actors {
        if let Some(actor) = state
            .store
            .find_one(ACTORS, &Filter::Id(*actor_id))
            .map_err(catalog_error)?
        {
            actors.push(actor);
        }
    }

    Ok(Json(ApiResponse::success(actors)))
}
