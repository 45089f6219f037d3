//! Review resource handlers
//!
//! Reviews are nested under their film: a review belongs to exactly one
//! existing film at creation time, and the film's `reviews` list is the
//! back-reference the link engine keeps in step. The reviewer profile is
//! owned elsewhere; this module only checks it exists.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

use filmstore_core::{
    constants::{FILMS, PROFILES, REVIEWS},
    core::AppState,
    log_info, CatalogError, DocId, Document, Filter, Patch, Review, StoreImpl,
};

use super::{catalog_error, parse_id, ApiError, ApiResponse, JsonRequest};

/// Identity of a created review
#[derive(Debug, serde::Serialize)]
pub struct CreatedReview {
    /// Generated review identity token
    pub review_id: String,
}

fn require_film<S: StoreImpl>(state: &AppState<S>, film_id: DocId) -> Result<Document, ApiError> {
    state
        .store
        .find_one(FILMS, &Filter::Id(film_id))
        .map_err(catalog_error)?
        .ok_or_else(|| catalog_error(CatalogError::NotFound("film")))
}

/// Fetch a review and check it belongs to the film in the path; a review
/// reached through the wrong film is treated as absent.
fn require_review<S: StoreImpl>(
    state: &AppState<S>,
    film_id: DocId,
    review_id: DocId,
) -> Result<Review, ApiError> {
    let doc = state
        .store
        .find_one(REVIEWS, &Filter::Id(review_id))
        .map_err(catalog_error)?
        .ok_or_else(|| catalog_error(CatalogError::NotFound("review")))?;
    let review = Review::decode(&doc).map_err(catalog_error)?;
    if review.film_id != film_id {
        return Err(catalog_error(CatalogError::NotFound("review")));
    }
    Ok(review)
}

/// List every review of one film.
pub async fn list_reviews<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let film_id = parse_id(&id)?;
    require_film(&state, film_id)?;

    let docs = state
        .store
        .find(REVIEWS, &Filter::Eq("film_id", Value::String(film_id.to_string())))
        .map_err(catalog_error)?;
    let mut reviews = Vec::with_capacity(docs.len());
    for doc in &docs {
        reviews.push(Review::decode(doc).map_err(catalog_error)?.encode());
    }

    Ok(Json(ApiResponse::success(serde_json::json!({
        "film_id": film_id.to_string(),
        "reviews": reviews,
    }))))
}

/// Create a review for one film.
///
/// The film must exist and the authoring profile must be present in the
/// `profiles` collection. Insert and film-list update appear atomic to
/// callers: on link failure the engine deletes the review again.
pub async fn create_review<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    JsonRequest(body): JsonRequest<Document>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedReview>>), ApiError> {
    let film_id = parse_id(&id)?;
    require_film(&state, film_id)?;

    let profile_id: DocId = match body.get("profile_id").and_then(Value::as_str) {
        Some(raw) => raw.parse().map_err(catalog_error)?,
        None => return Err(catalog_error(CatalogError::MissingField("profile_id"))),
    };
    state
        .store
        .find_one(PROFILES, &Filter::Id(profile_id))
        .map_err(catalog_error)?
        .ok_or_else(|| catalog_error(CatalogError::NotFound("profile")))?;

    let text = match body.get("text").and_then(Value::as_str) {
        Some(text) => text.to_string(),
        None => return Err(catalog_error(CatalogError::MissingField("text"))),
    };
    let nickname = body
        .get("nickname")
        .and_then(Value::as_str)
        .map(str::to_string);

    let review = Review {
        id: None,
        film_id,
        profile_id,
        text,
        nickname,
    };
    let review_id = state
        .links
        .create_review(film_id, &review)
        .map_err(catalog_error)?;
    log_info!("created review {} for film {}", review_id, film_id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreatedReview {
            review_id: review_id.to_string(),
        })),
    ))
}

/// Fetch one review of one film.
pub async fn get_review<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
    Path((id, rid)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Document>>, ApiError> {
    let film_id = parse_id(&id)?;
    let review_id = parse_id(&rid)?;
    let review = require_review(&state, film_id, review_id)?;
    Ok(Json(ApiResponse::success(review.encode())))
}

/// Partially update one review; only `text` and `nickname` may change.
/// A body supplying neither is rejected.
pub async fn update_review<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
    Path((id, rid)): Path<(String, String)>,
    JsonRequest(body): JsonRequest<Document>,
) -> Result<Json<ApiResponse<Document>>, ApiError> {
    let film_id = parse_id(&id)?;
    let review_id = parse_id(&rid)?;
    require_review(&state, film_id, review_id)?;

    let mut fields = Document::new();
    for key in ["text", "nickname"] {
        if let Some(value) = body.get(key) {
            fields.insert(key.to_string(), value.clone());
        }
    }
    if fields.is_empty() {
        return Err(catalog_error(CatalogError::MissingField("text or nickname")));
    }

    let updated = state
        .store
        .update_one(REVIEWS, &Filter::Id(review_id), &Patch::Set(fields))
        .map_err(catalog_error)?
        .ok_or_else(|| catalog_error(CatalogError::NotFound("review")))?;

    Ok(Json(ApiResponse::success(updated)))
}

/// Delete one review and pull it from the film's list.
pub async fn delete_review<S: StoreImpl>(
    State(state): State<Arc<AppState<S>>>,
    Path((id, rid)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let film_id = parse_id(&id)?;
    let review_id = parse_id(&rid)?;
    require_film(&state, film_id)?;
    require_review(&state, film_id, review_id)?;

    state
        .links
        .delete_review(film_id, review_id)
        .map_err(catalog_error)?;
    Ok(StatusCode::NO_CONTENT)
}
