//! Unified error handling with Sentry integration.
//!
//! All route handlers return `Result<T, ApiError>`. The response body is
//! always `{"message": ...}` with the taxonomy's status code; internal detail
//! is logged server-side and never leaked to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::token::TokenError;
use crate::stream::StreamError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or out-of-range input.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness rule was violated (duplicate email).
    #[error("{0}")]
    Conflict(String),

    /// Login failed. Unknown email and wrong password share this variant
    /// so the two are indistinguishable on the wire.
    #[error("{0}")]
    InvalidCredentials(String),

    /// Missing, invalid, or expired token.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but the role requirement is unmet.
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// The external chat service call failed.
    #[error("chat service error: {0}")]
    Upstream(#[from] StreamError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// The wire shape of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry; client errors are expected traffic.
        if matches!(self, Self::Database(_) | Self::Upstream(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            // The wire contract answers 400 for conflicts (not 409) and for
            // failed logins (not 401); 401 is reserved for token problems.
            Self::Validation(_) | Self::Conflict(_) | Self::InvalidCredentials(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Upstream(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Server error".to_string(),
            Self::Upstream(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            // Deliberately identical for unknown email and wrong password.
            AuthError::InvalidCredentials => {
                Self::InvalidCredentials("Invalid credentials".to_string())
            }
            AuthError::EmailTaken => Self::Conflict("User already exists".to_string()),
            AuthError::InvalidEmail(e) => Self::Validation(e.to_string()),
            AuthError::WeakPassword(msg) => Self::Validation(msg),
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_string()),
            AuthError::Repository(e) => Self::Database(e),
            AuthError::Token(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<crate::services::chat::ChatError> for ApiError {
    fn from(err: crate::services::chat::ChatError) -> Self {
        use crate::services::chat::ChatError;
        match err {
            ChatError::UserNotFound => Self::NotFound("User not found".to_string()),
            ChatError::Repository(e) => Self::Database(e),
            ChatError::Stream(e) => Self::Upstream(e),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::Unauthorized("Token expired".to_string()),
            TokenError::Invalid | TokenError::Malformed => {
                Self::Unauthorized("Invalid token".to_string())
            }
            TokenError::Signing(msg) => Self::Internal(msg),
        }
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;
