//! Response decoding policy.
//!
//! A single table maps each declarative verb and result shape to the statuses
//! that count as success:
//!
//! | verb   | unit  | value      | value with headers |
//! |--------|-------|------------|--------------------|
//! | GET    | 204   | 200, 203   | 200, 203, 204      |
//! | POST   | 204   | 200, 201   | 200, 201           |
//! | PUT    | 204   | 200, 201   | 200, 201           |
//! | PATCH  | 204   | 200, 201   | 200, 201, 204      |
//! | DELETE | 204   | 200, 202   | 200, 202           |
//!
//! GET and PATCH additionally accept `204` when headers are declared; an empty
//! `204` body then decodes as `null`.

use bytes::Bytes;
use mime::Mime;
use serde_json::Value;
use tracing::debug;

use crate::api::ResultShape;
use crate::codec::CodecRegistry;
use crate::error::{join_media_types, ClientError, CodecError};
use crate::method::RestMethod;

const NO_CONTENT: &[u16] = &[204];

/// Which response statuses a leaf treats as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptedStatus {
    /// Only the listed statuses.
    Only(&'static [u16]),
    /// Every status (raw endpoints).
    Any,
}

impl AcceptedStatus {
    /// Looks up the success statuses for a verb and result shape.
    ///
    /// Returns `None` for methods without a declarative policy.
    pub fn for_verb(method: RestMethod, shape: &ResultShape) -> Option<Self> {
        let statuses: &'static [u16] = match (method, shape) {
            (_, ResultShape::Unit) if method.is_declarative() => NO_CONTENT,
            (RestMethod::Get, ResultShape::Value) => &[200, 203],
            (RestMethod::Get, ResultShape::ValueWithHeaders(_)) => &[200, 203, 204],
            (RestMethod::Post | RestMethod::Put, _) => &[200, 201],
            (RestMethod::Patch, ResultShape::Value) => &[200, 201],
            (RestMethod::Patch, ResultShape::ValueWithHeaders(_)) => &[200, 201, 204],
            (RestMethod::Delete, _) => &[200, 202],
            _ => return None,
        };
        Some(Self::Only(statuses))
    }

    /// Returns `true` if `status` counts as success.
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            Self::Only(statuses) => statuses.contains(&status),
            Self::Any => true,
        }
    }

    /// The explicit status list, or `None` for [`Any`](Self::Any).
    pub fn statuses(&self) -> Option<&'static [u16]> {
        match self {
            Self::Only(statuses) => Some(statuses),
            Self::Any => None,
        }
    }
}

/// A response body decoded through the codec registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// The response's media type.
    pub media_type: Mime,
    /// The raw body.
    pub body: Bytes,
    /// The decoded pivot value.
    pub value: Value,
}

impl Decoded {
    /// Converts the decoded value into `T`.
    ///
    /// ## Errors
    ///
    /// Returns [`ClientError::DecodeFailure`] when the value does not fit `T`.
    pub fn into_typed<T: serde::de::DeserializeOwned>(self) -> Result<T, ClientError> {
        let Decoded {
            media_type,
            body,
            value,
        } = self;
        serde_json::from_value(value).map_err(|e| ClientError::DecodeFailure {
            media_type,
            body,
            source: CodecError::Json(e),
        })
    }
}

/// Decodes an accepted response body.
///
/// The response media type is matched against `declared` in order and decoded
/// with the first registered codec that covers it.
///
/// ## Errors
///
/// Returns [`ClientError::DecodeFailure`] when no declared media type covers
/// the response with a registered codec, or when the codec rejects the body.
pub fn decode_body(
    codecs: &CodecRegistry,
    declared: &[Mime],
    media_type: Mime,
    body: Bytes,
) -> Result<Decoded, ClientError> {
    let Some(codec) = codecs.decoder_for(declared, &media_type) else {
        debug!(
            media_type = %media_type,
            declared = %join_media_types(declared),
            "no decoder for response media type"
        );
        return Err(ClientError::DecodeFailure {
            media_type,
            body,
            source: CodecError::NoMatchingCodec {
                declared: join_media_types(declared),
            },
        });
    };

    match codec.decode(&body) {
        Ok(value) => Ok(Decoded {
            media_type,
            body,
            value,
        }),
        Err(source) => Err(ClientError::DecodeFailure {
            media_type,
            body,
            source,
        }),
    }
}
