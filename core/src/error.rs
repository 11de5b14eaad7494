//! Error types for the GitLab request core.
//!
//! # Design
//! Every failure surfaces to the caller as one of four kinds. Non-2xx
//! responses are never special-cased per status code: they all land in
//! `Http` with the raw status and body, and the caller decides what a 404
//! or a 401 means for them.

use thiserror::Error;

/// Errors returned by `GitlabClient` and the transports it drives.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connection refused,
    /// DNS failure, timeout).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A 2xx response body was not valid JSON, or did not match the
    /// expected shape.
    #[error("decoding failed: {0}")]
    Decode(String),

    /// The client configuration is missing or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Status code carried by an `Http` error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
