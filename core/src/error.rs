//! Error types for the API client.
//!
//! # Design
//! `Client` is the one failure the server can cause: a non-2xx status. Its
//! message is always `"API Error: <status text>"`. The raw body is kept so a
//! caller can look for a structured payload, but nothing decodes it unless
//! asked. Transport and decode failures get their own variants instead of
//! being folded into `Client`.

use crate::types::ApiErrorResponse;

/// A non-success HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    pub status: u16,
    pub message: String,
    /// Raw response body, possibly empty.
    pub body: String,
}

impl ClientError {
    pub fn new(status: u16, status_text: &str, body: String) -> Self {
        Self {
            status,
            message: format!("API Error: {status_text}"),
            body,
        }
    }

    /// Decode the retained body as an `ApiErrorResponse`, if it is one.
    pub fn payload(&self) -> Option<ApiErrorResponse> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Errors returned by `ApiClient`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The transport could not complete the round trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body is not valid JSON for the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A caller-supplied decoder rejected the payload.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl ApiError {
    /// HTTP status for `Client` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Client(err) => Some(err.status),
            _ => None,
        }
    }
}
