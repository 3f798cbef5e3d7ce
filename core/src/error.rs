//! Error taxonomy for the search API client.
//!
//! # Design
//! One closed enum covers every way a described call can fail, so all three
//! executor strategies surface the same taxonomy. Classification order:
//! `Transport` for failures before a response exists, `NoResponse` for a
//! reply that is not a recognizable HTTP envelope, `Server` for non-2xx
//! statuses (decoding is never attempted), `Decode` for a 2xx body that does
//! not match the expected shape. `InvalidRequest` is produced at descriptor
//! construction, before any network call.

use std::fmt;

/// Errors surfaced by descriptor construction and the executor strategies.
#[derive(Debug)]
pub enum ApiError {
    /// The target URL could not be parsed as an absolute URL. Raised when the
    /// descriptor is built, never after I/O has started.
    InvalidRequest(String),

    /// The server answered with a status outside [200, 300). The exact code
    /// is preserved for diagnostics.
    Server(u16),

    /// Something answered, but not with a recognizable HTTP response.
    NoResponse,

    /// The response body could not be decoded into the expected model.
    Decode(String),

    /// Connection-level failure before a response was obtained. Also the
    /// catch-all for transport errors with no more specific classification.
    Transport(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            ApiError::Server(status) => write!(f, "server returned HTTP {status}"),
            ApiError::NoResponse => write!(f, "no usable HTTP response"),
            ApiError::Decode(msg) => write!(f, "decoding failed: {msg}"),
            ApiError::Transport(msg) => write!(f, "transport failed: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_preserves_server_status() {
        let err = ApiError::Server(503);
        assert_eq!(err.to_string(), "server returned HTTP 503");
    }

    #[test]
    fn display_carries_decode_cause() {
        let err = ApiError::Decode("missing field `total_count`".to_string());
        assert!(err.to_string().contains("missing field `total_count`"));
    }

    #[test]
    fn display_carries_invalid_url() {
        let err = ApiError::InvalidRequest("\"not a url\"".to_string());
        assert!(err.to_string().starts_with("invalid request"));
    }
}
