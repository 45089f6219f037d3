//! End-to-end tests driving the full router over an in-memory store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use filmstore_core::{
    constants::{PROFILES, REVIEWS},
    core::{AppState, Config},
    DocumentStore, MemoryStore,
};
use filmstore_server::api::server::build_router;

fn app() -> (Arc<AppState<MemoryStore>>, Router) {
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::new(store, Config::default()));
    let router = build_router(state.clone());
    (state, router)
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn hanks() -> Value {
    json!({
        "name": "Tom",
        "surname": "Hanks",
        "date_of_birth": "1956-07-09",
    })
}

fn cast_away(actors: Value) -> Value {
    json!({
        "title": "Cast Away",
        "actors": actors,
        "release_year": 2000,
        "genre": "Drama",
        "rating": 7.8,
        "description": "A FedEx executive is stranded on an island.",
        "image_path": "/images/cast_away.jpg",
        "trailer_path": "/trailers/cast_away.mp4",
    })
}

async fn create_actor(router: &Router, payload: Value) -> String {
    let (status, body) = send(router, Method::POST, "/actors", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["ids"][0].as_str().unwrap().to_string()
}

async fn create_film(router: &Router, payload: Value) -> String {
    let (status, body) = send(router, Method::POST, "/films", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["ids"][0].as_str().unwrap().to_string()
}

fn seed_profile(state: &AppState<MemoryStore>) -> String {
    let doc = json!({ "username": "moviebuff" }).as_object().unwrap().clone();
    state
        .store
        .insert_one(PROFILES, doc)
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn health_and_banner_respond() {
    let (_, router) = app();
    let (status, _) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&router, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("filmstore"));
}

#[tokio::test]
async fn duplicate_surname_is_rejected_and_store_unchanged() {
    let (_, router) = app();
    create_actor(&router, hanks()).await;

    let (status, body) = send(&router, Method::POST, "/actors", Some(hanks())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("duplicate key"));

    let (_, body) = send(&router, Method::GET, "/actors", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn batch_actor_creation_returns_every_id() {
    let (_, router) = app();
    let batch = json!([
        hanks(),
        { "name": "Helen", "surname": "Hunt", "date_of_birth": "1963-06-15" },
    ]);
    let (status, body) = send(&router, Method::POST, "/actors", Some(batch)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["ids"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn actor_creation_requires_every_field() {
    let (_, router) = app();
    let (status, body) = send(
        &router,
        Method::POST,
        "/actors",
        Some(json!({ "name": "Tom", "surname": "Hanks" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("date_of_birth"));
}

#[tokio::test]
async fn film_creation_links_actor_and_drops_unknown_surnames() {
    let (_, router) = app();
    let actor_id = create_actor(&router, hanks()).await;
    let film_id = create_film(&router, cast_away(json!(["Hanks", "Nobody"]))).await;

    // Stored film holds the resolved id, not the surname.
    let (status, body) = send(&router, Method::GET, &format!("/films/{}", film_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["actors"], json!([actor_id]));

    // And the actor now lists the film.
    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/actors/{}/films", actor_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let films = body["data"]["films"].as_array().unwrap();
    assert_eq!(films.len(), 1);
    assert_eq!(films[0]["title"], json!("Cast Away"));
}

#[tokio::test]
async fn repeated_film_creation_never_duplicates_back_references() {
    let (_, router) = app();
    let actor_id = create_actor(&router, hanks()).await;
    let first = create_film(&router, cast_away(json!(["Hanks"]))).await;
    let second = create_film(&router, cast_away(json!(["Hanks"]))).await;

    let (_, body) = send(&router, Method::GET, &format!("/actors/{}", actor_id), None).await;
    let films = body["data"]["films"].as_array().unwrap();
    assert_eq!(films.len(), 2);
    assert!(films.contains(&json!(first)));
    assert!(films.contains(&json!(second)));
}

#[tokio::test]
async fn malformed_and_missing_ids_map_to_400_and_404() {
    let (_, router) = app();
    let (status, _) = send(&router, Method::GET, "/films/not-a-real-id!!", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&router, Method::GET, "/films/0123456789abcdef", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn partial_update_merges_fields() {
    let (_, router) = app();
    let film_id = create_film(&router, cast_away(json!([]))).await;

    let (status, body) = send(
        &router,
        Method::PUT,
        &format!("/films/{}", film_id),
        Some(json!({ "rating": 8.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rating"], json!(8.5));
    assert_eq!(body["data"]["title"], json!("Cast Away"));
    assert_eq!(body["data"]["genre"], json!("Drama"));
}

#[tokio::test]
async fn updating_the_cast_relinks_back_references() {
    let (_, router) = app();
    let hanks_id = create_actor(&router, hanks()).await;
    let hunt_id = create_actor(
        &router,
        json!({ "name": "Helen", "surname": "Hunt", "date_of_birth": "1963-06-15" }),
    )
    .await;
    let film_id = create_film(&router, cast_away(json!(["Hanks"]))).await;

    let (status, _) = send(
        &router,
        Method::PUT,
        &format!("/films/{}", film_id),
        Some(json!({ "actors": ["Hunt"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&router, Method::GET, &format!("/actors/{}", hanks_id), None).await;
    assert_eq!(body["data"]["films"], json!([]));
    let (_, body) = send(&router, Method::GET, &format!("/actors/{}", hunt_id), None).await;
    assert_eq!(body["data"]["films"], json!([film_id]));
}

#[tokio::test]
async fn deleting_a_film_cascades_to_actors_and_reviews() {
    let (state, router) = app();
    let actor_id = create_actor(&router, hanks()).await;
    let film_id = create_film(&router, cast_away(json!(["Hanks"]))).await;
    let profile_id = seed_profile(&state);
    let (status, _) = send(
        &router,
        Method::POST,
        &format!("/films/{}/reviews", film_id),
        Some(json!({ "profile_id": profile_id, "text": "Great movie!" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&router, Method::DELETE, &format!("/films/{}", film_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&router, Method::GET, &format!("/actors/{}", actor_id), None).await;
    assert_eq!(body["data"]["films"], json!([]));
    assert_eq!(state.store.count(REVIEWS), 0);

    // Idempotent from the caller's view: a second delete is a plain 404.
    let (status, _) = send(&router, Method::DELETE, &format!("/films/{}", film_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_lifecycle_keeps_film_list_in_step() {
    let (state, router) = app();
    let film_id = create_film(&router, cast_away(json!([]))).await;
    let profile_id = seed_profile(&state);

    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/films/{}/reviews", film_id),
        Some(json!({ "profile_id": profile_id, "text": "Great movie!", "nickname": "moviebuff" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let review_id = body["data"]["review_id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &router,
        Method::GET,
        &format!("/films/{}/reviews", film_id),
        None,
    )
    .await;
    let reviews = body["data"]["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["_id"], json!(review_id));
    let (_, body) = send(&router, Method::GET, &format!("/films/{}", film_id), None).await;
    assert_eq!(body["data"]["reviews"], json!([review_id]));

    let (status, _) = send(
        &router,
        Method::DELETE,
        &format!("/films/{}/reviews/{}", film_id, review_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(
        &router,
        Method::GET,
        &format!("/films/{}/reviews", film_id),
        None,
    )
    .await;
    assert_eq!(body["data"]["reviews"], json!([]));
    let (_, body) = send(&router, Method::GET, &format!("/films/{}", film_id), None).await;
    assert_eq!(body["data"]["reviews"], json!([]));
}

#[tokio::test]
async fn review_creation_checks_film_and_profile() {
    let (state, router) = app();
    let film_id = create_film(&router, cast_away(json!([]))).await;
    let profile_id = seed_profile(&state);

    // Unknown film.
    let (status, _) = send(
        &router,
        Method::POST,
        "/films/0123456789abcdef/reviews",
        Some(json!({ "profile_id": profile_id, "text": "lost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Unknown profile.
    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/films/{}/reviews", film_id),
        Some(json!({ "profile_id": "0123456789abcdef", "text": "ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("profile"));

    // Missing text.
    let (status, _) = send(
        &router,
        Method::POST,
        &format!("/films/{}/reviews", film_id),
        Some(json!({ "profile_id": profile_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn review_update_needs_at_least_one_valid_field() {
    let (state, router) = app();
    let film_id = create_film(&router, cast_away(json!([]))).await;
    let profile_id = seed_profile(&state);
    let (_, body) = send(
        &router,
        Method::POST,
        &format!("/films/{}/reviews", film_id),
        Some(json!({ "profile_id": profile_id, "text": "first draft" })),
    )
    .await;
    let review_id = body["data"]["review_id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &router,
        Method::PUT,
        &format!("/films/{}/reviews/{}", film_id, review_id),
        Some(json!({ "rating": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &router,
        Method::PUT,
        &format!("/films/{}/reviews/{}", film_id, review_id),
        Some(json!({ "text": "second draft" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["text"], json!("second draft"));
}

#[tokio::test]
async fn film_creation_validates_before_inserting() {
    let (_, router) = app();
    let mut incomplete = cast_away(json!([]));
    incomplete.as_object_mut().unwrap().remove("genre");

    let (status, _) = send(
        &router,
        Method::POST,
        "/films",
        Some(json!([cast_away(json!([])), incomplete])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&router, Method::GET, "/films", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn reviews_reached_through_the_wrong_film_are_absent() {
    let (state, router) = app();
    let film_a = create_film(&router, cast_away(json!([]))).await;
    let mut other = cast_away(json!([]));
    other["title"] = json!("Forrest Gump");
    let film_b = create_film(&router, other).await;
    let profile_id = seed_profile(&state);
    let (_, body) = send(
        &router,
        Method::POST,
        &format!("/films/{}/reviews", film_a),
        Some(json!({ "profile_id": profile_id, "text": "wrong door" })),
    )
    .await;
    let review_id = body["data"]["review_id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &router,
        Method::GET,
        &format!("/films/{}/reviews/{}", film_b, review_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
