//! Errors returned by derived endpoint invocations.

use bytes::Bytes;
use mime::Mime;
use reqwest::header::HeaderMap;
use thiserror::Error;

use super::{join_media_types, ArgumentError, CodecError, TransportError};

/// Error returned to the caller of a derived endpoint.
///
/// Every variant is terminal for the invocation: the client never retries and
/// never returns partial results.
///
/// ## Examples
///
/// ```rust,ignore
/// use routekit::ClientError;
///
/// match get_user.call().capture(42).send::<User>().await {
///     Ok(user) => println!("{}", user.name),
///     Err(ClientError::UnsuccessfulStatus { status: 404, .. }) => println!("no such user"),
///     Err(e) => eprintln!("request failed: {e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport could not complete the exchange.
    #[error("Connection failed: {0}")]
    Connection(#[from] TransportError),

    /// The server answered with a status outside the endpoint's accepted set.
    #[error("Unsuccessful status {status}")]
    UnsuccessfulStatus {
        /// The HTTP status code returned.
        status: u16,
        /// The response headers.
        headers: HeaderMap,
        /// The raw response body.
        body: Bytes,
    },

    /// The status was accepted but the body could not be decoded.
    #[error("Failed to decode {media_type} response: {source}")]
    DecodeFailure {
        /// The response's media type.
        media_type: Mime,
        /// The raw response body.
        body: Bytes,
        /// What went wrong while decoding.
        #[source]
        source: CodecError,
    },

    /// The response's `Content-Type` header could not be parsed.
    #[error("Invalid Content-Type header: {value}")]
    InvalidContentTypeHeader {
        /// The header value as received (lossily decoded).
        value: String,
        /// The raw response body.
        body: Bytes,
    },

    /// None of a request body's declared media types has an encoder.
    #[error("No encoder available for any of [{}]", join_media_types(.media_types))]
    EncodingUnavailable {
        /// The declared media types, in preference order.
        media_types: Vec<Mime>,
    },

    /// A request body could not be encoded with the selected codec.
    #[error("Failed to encode request body as {media_type}: {source}")]
    EncodeFailure {
        /// The selected media type.
        media_type: Mime,
        /// What went wrong while encoding.
        #[source]
        source: CodecError,
    },

    /// The supplied arguments do not fit the endpoint.
    #[error(transparent)]
    InvalidArguments(#[from] ArgumentError),
}

impl ClientError {
    /// Returns the HTTP status code if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnsuccessfulStatus { status, .. } => Some(*status),
            Self::Connection(TransportError::Request(e)) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the transport failed before a response arrived.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the server rejected the request with a status code.
    pub fn is_unsuccessful_status(&self) -> bool {
        matches!(self, Self::UnsuccessfulStatus { .. })
    }

    /// Returns the raw response body, when the failure carries one.
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Self::UnsuccessfulStatus { body, .. }
            | Self::DecodeFailure { body, .. }
            | Self::InvalidContentTypeHeader { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsuccessful_status() {
        let err = ClientError::UnsuccessfulStatus {
            status: 404,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"not found"),
        };
        assert_eq!(err.status_code(), Some(404));
        assert!(err.is_unsuccessful_status());
        assert!(!err.is_connection());
        assert_eq!(err.body().map(|b| b.as_ref()), Some(&b"not found"[..]));
        assert_eq!(err.to_string(), "Unsuccessful status 404");
    }

    #[test]
    fn test_encoding_unavailable_display() {
        let err = ClientError::EncodingUnavailable {
            media_types: vec![mime::APPLICATION_JSON, mime::TEXT_PLAIN],
        };
        assert_eq!(
            err.to_string(),
            "No encoder available for any of [application/json, text/plain]"
        );
        assert_eq!(err.status_code(), None);
        assert!(err.body().is_none());
    }

    #[test]
    fn test_from_transport_error() {
        let err: ClientError = TransportError::Other("reset".to_string()).into();
        assert!(err.is_connection());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_decode_failure_display() {
        let source = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err = ClientError::DecodeFailure {
            media_type: mime::APPLICATION_JSON,
            body: Bytes::from_static(b"nope"),
            source: source.into(),
        };
        assert!(err
            .to_string()
            .starts_with("Failed to decode application/json response"));
    }
}
