//! Error types for the storefront API client.
//!
//! # Design
//! A non-2xx response and a failed round trip are kept apart. `Status`
//! carries the response shaped by the same call options as a success would
//! be, so callers read field errors the same way they read data. `Transport`
//! covers every case where no response exists at all.

use crate::transform::Reply;

/// Failures of the round trip itself; no response is available.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("response body of {actual} bytes exceeds limit of {limit} bytes")]
    ContentTooLarge { limit: u64, actual: u64 },

    #[error("transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Errors returned by `ApiClient` calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}")]
    Status { status: u16, reply: Reply },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request body could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A response body did not match the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(serde_json::Error),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status of a rejected response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The shaped response of a rejected call.
    pub fn reply(&self) -> Option<&Reply> {
        match self {
            ApiError::Status { reply, .. } => Some(reply),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_error_exposes_reply() {
        let err = ApiError::Status {
            status: 404,
            reply: Reply::Body(json!({ "message": "gone" })),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "HTTP 404");
        assert_eq!(err.reply().and_then(Reply::body), Some(&json!({ "message": "gone" })));
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = ApiError::from(TransportError::Timeout);
        assert_eq!(err.status(), None);
        assert!(err.reply().is_none());
        assert_eq!(err.to_string(), "request timed out");
    }

    #[test]
    fn decoding_a_reply_into_the_wrong_type_is_a_deserialization_error() {
        let err = Reply::Body(json!({ "id": "not a number" }))
            .json::<Vec<u64>>()
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)), "{err:?}");
        assert!(err.to_string().starts_with("deserialization failed"));
    }
}
