//! Stream Chat API error types.

use thiserror::Error;

/// Errors that can occur when calling the Stream Chat API.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Failed to send the request.
    #[error("request failed: {0}")]
    Request(String),

    /// Failed to parse the response.
    #[error("invalid response: {0}")]
    Response(String),

    /// Stream returned an error.
    #[error("Stream API error ({code}): {message}")]
    Api {
        /// Stream's numeric error code.
        code: i64,
        /// Human-readable message from Stream.
        message: String,
    },

    /// Failed to mint a token against the app secret.
    #[error("token creation failed: {0}")]
    Token(String),
}
