//! Errors surfaced by `TodoClient::parse_*`.
//!
//! The service answers every rejection with a plain-text message. 400, 404
//! and 409 each get a variant carrying that message; any other unexpected
//! status lands in `HttpError` with the raw body.

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400: the service rejected a field, e.g. "Invalid Todo Status".
    #[error("rejected: {0}")]
    Rejected(String),

    /// 404: no todo with the requested id.
    #[error("resource not found")]
    NotFound,

    /// 409: a todo with the same id already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}
