//! Error types for the web crate.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use giveaway_store::StoreError;
use thiserror::Error;

/// Errors that reach the response layer. Validation and authorization
/// failures never land here — those are redirects with a visible warning.
#[derive(Debug, Error)]
pub enum WebError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            WebError::Store(err) => {
                tracing::error!(error = %err, "request failed");
                // Internal detail stays out of the response body.
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "something went wrong, please try again later",
                )
                    .into_response()
            }
        }
    }
}
