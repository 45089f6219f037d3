//! HTTP API for the filmstore catalog
//!
//! Shared response envelopes, the JSON body extractor and the error →
//! status translation live here; per-resource handlers sit in their own
//! modules.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::Json,
    Json as JsonExtractor,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use filmstore_core::{log_warn, CatalogError, DocId};

/// Router assembly and server startup
pub mod server;
/// Actor resource handlers
pub mod actors;
/// Film resource handlers
pub mod films;
/// Review resource handlers
pub mod reviews;
/// Service banner and health endpoints
pub mod system;

/// Standard API response wrapper for all endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the operation was successful
    pub success: bool,
    /// Response data (if successful)
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a successful API response with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

/// Error response for failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Whether the operation was successful (always false)
    pub success: bool,
    /// Error message
    pub error: String,
    /// Optional details about what was invalid
    pub details: Option<Value>,
}

impl ErrorResponse {
    /// Create an error response from a message
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
        }
    }
}

/// Handler error type: a status code plus a JSON error body
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Identities created by a POST, in input order
#[derive(Debug, Serialize)]
pub struct CreatedIds {
    /// Generated identity tokens
    pub ids: Vec<String>,
}

/// Translate a catalog error into its HTTP shape.
///
/// The taxonomy maps directly: malformed ids and bad input are 400,
/// missing documents 404, backend failures 500.
pub fn catalog_error(err: CatalogError) -> ApiError {
    let status = match &err {
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CatalogError::InvalidIdentifier(_)
        | CatalogError::MissingField(_)
        | CatalogError::DuplicateKey(_) => StatusCode::BAD_REQUEST,
    };
    (status, Json(ErrorResponse::new(err.to_string())))
}

/// Parse a path id token, failing with a JSON 400 on malformed input.
pub fn parse_id(raw: &str) -> Result<DocId, ApiError> {
    raw.parse().map_err(catalog_error)
}

/// Custom JSON extractor that returns proper JSON error responses
/// instead of axum's plain-text rejections.
pub struct JsonRequest<T>(pub T);

impl<T, S> axum::extract::FromRequest<S> for JsonRequest<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        match JsonExtractor::<T>::from_request(req, state).await {
            Ok(JsonExtractor(value)) => Ok(JsonRequest(value)),
            Err(rejection) => {
                let error_message = match rejection {
                    JsonRejection::JsonDataError(_) => "Invalid JSON data".to_string(),
                    JsonRejection::JsonSyntaxError(_) => "Malformed JSON".to_string(),
                    JsonRejection::MissingJsonContentType(_) => {
                        "Missing or invalid Content-Type header. Expected 'application/json'"
                            .to_string()
                    }
                    JsonRejection::BytesRejection(_) => "Failed to read request body".to_string(),
                    _ => "Invalid JSON request".to_string(),
                };

                log_warn!("JSON parsing error: {}", error_message);
                Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(error_message)),
                ))
            }
        }
    }
}

/// A JSON body that is either one object or an array of them; both POST
/// collection endpoints accept both shapes.
pub fn one_or_many(body: Value) -> Result<Vec<filmstore_core::Document>, ApiError> {
    let items = match body {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    "Request body must be an object or an array of objects",
                )),
            ))
        }
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(doc) => Ok(doc),
            _ => Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Every record must be a JSON object")),
            )),
        })
        .collect()
}
