//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body for debugging.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than the expected one or 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
