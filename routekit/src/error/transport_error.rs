//! HTTP transport errors.

use thiserror::Error;

/// Errors from the transport layer.
///
/// These represent failures to complete an HTTP exchange at all. They are
/// surfaced verbatim through [`ClientError::Connection`](super::ClientError::Connection)
/// and never retried by the derived client.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed due to network or protocol error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Neither the client nor the transport provides a base URL.
    #[error("No base URL configured for request to {path}")]
    MissingBaseUrl {
        /// The request path that had no origin.
        path: String,
    },

    /// The request reached the transport without an HTTP method.
    #[error("No method set for request to {path}")]
    MissingMethod {
        /// The request path.
        path: String,
    },

    /// A header name or value is not valid on the wire.
    #[error("Invalid header {name}: {message}")]
    InvalidHeader {
        /// The header name as supplied.
        name: String,
        /// Why the header was rejected.
        message: String,
    },

    /// Failure reported by a custom transport.
    #[error("Transport failure: {0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` if the transport gave up waiting for the server.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if no connection to the server could be made.
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_base_url_display() {
        let err = TransportError::MissingBaseUrl {
            path: "/users/1".to_string(),
        };
        assert_eq!(err.to_string(), "No base URL configured for request to /users/1");
    }

    #[test]
    fn test_invalid_url_from_parse_error() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: TransportError = parse_err.into();
        assert!(err.to_string().contains("Invalid URL"));
        assert!(!err.is_timeout());
        assert!(!err.is_connect());
    }

    #[test]
    fn test_missing_method_display() {
        let err = TransportError::MissingMethod {
            path: "/users".to_string(),
        };
        assert_eq!(err.to_string(), "No method set for request to /users");
    }

    #[test]
    fn test_other_display() {
        let err = TransportError::Other("socket closed".to_string());
        assert_eq!(err.to_string(), "Transport failure: socket closed");
    }
}
