//! Actor resource handlers
//!
//! CRUD over the `actors` collection plus the resolved-films view. The
//! `films` back-reference list is owned by the link engine; these
//! handlers never let a payload write it directly.

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
    log_info, Actor, CatalogError, Document, Filter, Patch, StoreImpl,
};

use super::{catalog_error, one_or_many, parse_id, ApiError, ApiResponse, CreatedIds, JsonRequest};

/// Fields a PUT may overwrite; link fields stay engine-owned.
const UPDATABLE_FIELDS: &[&str] = &["name", "surname", "date_of_birth"];

/// List every actor, normalized through the codec.
pub async fn list_actors<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<ApiResponse<Vec<Document>>>, ApiError> {
    let docs = state
        .store
        .find(ACTORS, &Filter::All)
        .map_err(catalog_error)?;

    let mut actors = Vec::with_capacity(docs.len());
    for doc in &docs {
        // Decode/encode round-trip flattens legacy link-field shapes.
        actors.push(Actor::decode(doc).map_err(catalog_error)?.encode());
    }
    Ok(Json(ApiResponse::success(actors)))
}

/// Create one actor or a batch of them.
///
/// The whole batch is validated before anything is inserted: a missing
/// field or a surname collision (against the store or within the batch)
/// fails the request and leaves the store unchanged. New actors always
/// start with an empty film list.
pub async fn create_actors<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
    JsonRequest(body): JsonRequest<Value>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedIds>>), ApiError> {
    let payloads = one_or_many(body)?;

    let mut to_insert: Vec<Document> = Vec::with_capacity(payloads.len());
    let mut batch_surnames: Vec<String> = Vec::with_capacity(payloads.len());

    for payload in &payloads {
        let mut actor = Actor::decode(payload).map_err(catalog_error)?;
        actor.id = None;
        actor.films = Vec::new();

        let collision = state
            .store
            .find_one(ACTORS, &Filter::Eq("surname", Value::String(actor.surname.clone())))
            .map_err(catalog_error)?
            .is_some()
            || batch_surnames.contains(&actor.surname);
        if collision {
            return Err(catalog_error(CatalogError::DuplicateKey(format!(
                "actor with surname '{}' already exists",
                actor.surname
            ))));
        }

        batch_surnames.push(actor.surname.clone());
        to_insert.push(actor.encode());
    }

    let ids = state
        .store
        .insert_many(ACTORS, to_insert)
        .map_err(catalog_error)?;
    log_info!("created {} actor(s)", ids.len());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreatedIds {
            ids: ids.iter().map(|id| id.to_string()).collect(),
        })),
    ))
}

/// Fetch one actor by id.
pub async fn get_actor<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Document>>, ApiError> {
    let actor_id = parse_id(&id)?;
    let doc = state
        .store
        .find_one(ACTORS, &Filter::Id(actor_id))
        .map_err(catalog_error)?
        .ok_or_else(|| catalog_error(CatalogError::NotFound("actor")))?;

    let actor = Actor::decode(&doc).map_err(catalog_error)?;
    Ok(Json(ApiResponse::success(actor.encode())))
}

/// Partially update one actor; absent fields keep their prior values.
pub async fn update_actor<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    JsonRequest(body): JsonRequest<Document>,
) -> Result<Json<ApiResponse<Document>>, ApiError> {
    let actor_id = parse_id(&id)?;

    let mut fields = Document::new();
    for key in UPDATABLE_FIELDS {
        if let Some(value) = body.get(*key) {
            fields.insert((*key).to_string(), value.clone());
        }
    }

    let updated = state
        .store
        .update_one(ACTORS, &Filter::Id(actor_id), &Patch::Set(fields))
        .map_err(catalog_error)?
        .ok_or_else(|| catalog_error(CatalogError::NotFound("actor")))?;

    Ok(Json(ApiResponse::success(updated)))
}

/// Delete one actor. Films keep any stale reference to the actor; the
/// association has no single owner and the actor side is simply gone.
pub async fn delete_actor<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let actor_id = parse_id(&id)?;
    let removed = state
        .store
        .delete_one(ACTORS, &Filter::Id(actor_id))
        .map_err(catalog_error)?;
    if removed == 0 {
        return Err(catalog_error(CatalogError::NotFound("actor")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch one actor together with the resolved film documents their
/// back-reference list points at. Dangling references are skipped.
pub async fn get_actor_films<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let actor_id = parse_id(&id)?;
    let doc = state
        .store
        .find_one(ACTORS, &Filter::Id(actor_id))
        .map_err(catalog_error)?
        .ok_or_else(|| catalog_error(CatalogError::NotFound("actor")))?;
    let actor = Actor::decode(&doc).map_err(catalog_error)?;

    let mut films: Vec<Document> = Vec::with_capacity(actor.films.len());
    for film_id in &actor.films {
        if let Some(film) = state
            .store
            .find_one(FILMS, &Filter::Id(*film_id))
            .map_err(catalog_error)?
        {
            films.push(film);
        }
    }

    Ok(Json(ApiResponse::success(serde_json::json!({
        "actor": Value::Object(actor.encode()),
        "films": films,
    }))))
}
