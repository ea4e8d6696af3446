/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`, which converts to the matching
/// HTTP status code and a JSON error body.
///
/// | Variant | Status | `error` code |
/// |---|---|---|
/// | `MalformedRequest` | 400 | `malformed_request` |
/// | `InvalidRequest` | 400 | `malformed_request` (with `details`) |
/// | `NotFound` | 404 | `not_found` |
/// | `PersistenceFailure` | 500 | `persistence_failure` |
///
/// # Example
///
/// ```
/// use todolist_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::json;
///
/// async fn handler(id: i64) -> ApiResult<Json<serde_json::Value>> {
///     if id < 1 {
///         return Err(ApiError::MalformedRequest("id must be positive".to_string()));
///     }
///     Ok(Json(json!({ "id": id })))
/// }
/// ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use todolist_shared::models::WireKeys;
use todolist_shared::store::StoreError;
use validator::{ValidationErrors, ValidationErrorsKind};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Body or path could not be decoded into the expected shape (400)
    MalformedRequest(String),

    /// Body decoded but failed field validation (400)
    InvalidRequest(Vec<ValidationErrorDetail>),

    /// Update targeted an identifier that does not exist (404)
    NotFound(String),

    /// Storage rejected or could not perform the operation (500)
    PersistenceFailure(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation (`tags[0].__all__` for nested errors)
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "malformed_request", "not_found")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MalformedRequest(msg) => write!(f, "Malformed request: {}", msg),
            ApiError::InvalidRequest(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::PersistenceFailure(msg) => write!(f, "Persistence failure: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::MalformedRequest(msg) => {
                (StatusCode::BAD_REQUEST, "malformed_request", msg, None)
            }
            ApiError::InvalidRequest(errors) => (
                StatusCode::BAD_REQUEST,
                "malformed_request",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::PersistenceFailure(msg) => {
                // Log the cause but don't expose storage details to clients
                tracing::error!("Persistence failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "persistence_failure",
                    "The operation could not be completed".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert store errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StoreError::Constraint { .. } | StoreError::Database(_) => {
                ApiError::PersistenceFailure(err.to_string())
            }
        }
    }
}

/// Convert JSON body rejections (syntax, type mismatch, content type)
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

/// Convert path parameter rejections (e.g. a non-numeric ID)
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl ApiError {
    /// Builds an `InvalidRequest` from the validation errors of payload `T`
    ///
    /// Nested struct and list errors are flattened into paths such as
    /// `Tags[1].__all__`, using the JSON keys the client sent.
    pub fn invalid<T: WireKeys>(errors: &ValidationErrors) -> Self {
        let mut details = Vec::new();
        collect_details::<T>("", errors, &mut details);
        details.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::InvalidRequest(details)
    }
}

fn collect_details<T: WireKeys>(
    prefix: &str,
    errors: &ValidationErrors,
    out: &mut Vec<ValidationErrorDetail>,
) {
    for (field, kind) in errors.errors() {
        let name: &str = field;
        let key = T::wire_key(name).unwrap_or(name);
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|error| ValidationErrorDetail {
                    field: path.clone(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_details::<T>(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_details::<T>(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}
