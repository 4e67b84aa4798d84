//! HTTP route handlers.

pub mod auth;
pub mod chat;
pub mod health;
pub mod products;
pub mod upload;
pub mod users;

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON extractor that reports malformed bodies as validation errors.
///
/// The stock `Json` rejection answers 422 with a plain-text body; the API
/// contract wants 400 with `{"message": ...}` for every bad input.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}
