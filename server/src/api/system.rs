//! Service banner and health endpoints

use axum::response::Json;
use serde::Serialize;

use super::ApiResponse;

/// System health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current system status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Service banner response
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    /// Service name
    pub name: String,
    /// Service version
    pub version: String,
    /// Resources served by this API
    pub resources: Vec<String>,
}

/// Root route: what this service is.
pub async fn root_handler() -> Json<ApiResponse<InfoResponse>> {
    Json(ApiResponse::success(InfoResponse {
        name: "filmstore".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        resources: vec![
            "/actors".to_string(),
            "/films".to_string(),
            "/films/{id}/reviews".to_string(),
        ],
    }))
}

/// Health check route.
pub async fn health_check() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
