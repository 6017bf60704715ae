//! Error types for the wire layer.

/// Errors that can occur when talking to the B3 endpoints.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A URL could not be parsed (bad base URL or a malformed redirect target).
    #[error("invalid URL {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    /// No connection could be established after the retry budget ran out.
    #[error("could not connect to {url} after {attempts} attempts")]
    Transport {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
    /// The request failed for a reason other than connection establishment.
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("{url} returned code {status} {reason}")]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },
    /// The response body was not the JSON document we expected.
    #[error("failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// HTTP status code for `HttpStatus` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
