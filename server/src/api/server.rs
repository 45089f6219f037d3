//! HTTP server implementation for the filmstore API

use axum::{
    http::{
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::get,
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use filmstore_core::{
    core::{AppState, ConfiguredAppState},
    log_info, StoreImpl,
};

use super::{actors, films, reviews, system};

/// Creates the application router with all routes and middleware.
///
/// Public so integration tests can drive the full stack against an
/// injected in-memory store.
pub fn build_router<S: StoreImpl>(app_state: Arc<AppState<S>>) -> Router {
    // CORS configuration - permissive for now
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, ACCESS_CONTROL_ALLOW_ORIGIN])
        .allow_origin(Any)
        .allow_credentials(false);

    Router::new()
        // System routes
        .route("/", get(system::root_handler))
        .route("/health", get(system::health_check))
        // Actor routes
        .route(
            "/actors",
            get(actors::list_actors).post(actors::create_actors),
        )
        .route(
            "/actors/{id}",
            get(actors::get_actor)
                .put(actors::update_actor)
                .delete(actors::delete_actor),
        )
        .route("/actors/{id}/films", get(actors::get_actor_films))
        // Film routes
        .route("/films", get(films::list_films).post(films::create_films))
        .route(
            "/films/{id}",
            get(films::get_film)
                .put(films::update_film)
                .delete(films::delete_film),
        )
        .route("/films/{id}/actors", get(films::get_film_actors))
        // Review routes, nested under their film
        .route(
            "/films/{id}/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/films/{id}/reviews/{rid}",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        // Apply middleware to ALL routes
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(app_state)
}

/// Internal function to start the server with the configured router
async fn serve(addr: SocketAddr, app: Router) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    log_info!("Server listening on http://{}", addr);
    log_info!("Health check available at http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Start the HTTP server with the configured AppState
pub async fn start_api_server(
    configured: ConfiguredAppState,
) -> Result<(), Box<dyn std::error::Error>> {
    let http_addr = configured.http_addr();

    log_info!("Starting filmstore API server on {}", http_addr);

    // Match once on storage type to get concrete AppState, then serve
    match configured {
        ConfiguredAppState::Memory { app_state } => {
            log_info!("Starting server with MemoryStore backend");
            let app = build_router(Arc::new(app_state));
            serve(http_addr, app).await
        }
    }
}
