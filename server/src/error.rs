//! Error types for the store, the dispatcher and the binary.
//!
//! # Design
//! `StoreError::NotFound` is the only failure the in-memory store produces;
//! the dispatcher turns it into a 404. Anything else a backend reports is a
//! 500 carrying the backend's message. No request error is fatal to the
//! serving loop.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::model::TodoId;

/// Errors returned by [`TodoRepository`](crate::store::TodoRepository)
/// implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An update addressed an identity the store does not hold.
    #[error("Not Found")]
    NotFound(TodoId),

    /// The backing storage failed.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Errors a request handler can answer with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The trailing path segment is not a positive integer.
    #[error("Invalid Id")]
    InvalidId,

    /// The request body could not be decoded.
    #[error("{0}")]
    MalformedBody(String),

    /// No item with the requested identity.
    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId => StatusCode::BAD_REQUEST,
            ApiError::MalformedBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound | ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Store(StoreError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        // 404s go out without a body.
        if status == StatusCode::NOT_FOUND {
            return status.into_response();
        }
        (status, self.to_string()).into_response()
    }
}

/// Invalid server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name} value {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Errors that stop the server binary.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
