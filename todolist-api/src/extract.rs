/// Request extractors
///
/// Wrappers around axum's `Json` and `Path` that reject with [`ApiError`]
/// instead of axum's default plain-text responses. A rejected request never
/// reaches the handler body, so nothing is persisted for it.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use todolist_shared::models::WireKeys;
use validator::Validate;

use crate::error::ApiError;

/// JSON body that has been decoded and validated
///
/// Decoding failures (bad syntax, wrong field types, missing JSON content
/// type) and validation failures both become `400 malformed_request`.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + WireKeys + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|errors| ApiError::invalid::<T>(&errors))?;
        Ok(ValidJson(value))
    }
}

/// Numeric identifier taken from the route path (e.g. `/tasks/:id`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state).await?;
        Ok(PathId(id))
    }
}
