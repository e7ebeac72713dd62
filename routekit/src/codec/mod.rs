//! Codec registry and media-type selection.
//!
//! A [`Codec`] converts between bytes of one media type and a
//! [`serde_json::Value`], which acts as the pivot between typed Rust values and
//! wire formats. The [`CodecRegistry`] holds the codecs available to a client
//! and answers "which codec handles this declared media-type list". Selection
//! is always the first declared media type with a registered codec; it is a
//! fixed preference order, never negotiated with the server.

mod format;

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use mime::Mime;
use serde_json::Value;

use crate::error::CodecError;

pub use format::{BinaryCodec, JsonCodec, TextCodec, YamlCodec};

/// Encode/decode capability for a single media type.
///
/// ## Examples
///
/// ```rust,ignore
/// use routekit::codec::Codec;
///
/// #[derive(Debug)]
/// struct NdJson;
///
/// impl Codec for NdJson {
///     fn media_type(&self) -> &Mime { &NDJSON }
///     fn encode(&self, value: &Value) -> Result<Bytes, CodecError> { ... }
///     fn decode(&self, body: &[u8]) -> Result<Value, CodecError> { ... }
/// }
/// ```
pub trait Codec: Send + Sync + fmt::Debug {
    /// The media type this codec reads and writes.
    fn media_type(&self) -> &Mime;

    /// Encodes a value as a request body.
    fn encode(&self, value: &Value) -> Result<Bytes, CodecError>;

    /// Decodes a response body.
    fn decode(&self, body: &[u8]) -> Result<Value, CodecError>;
}

/// Returns `true` if `pattern` covers `actual`.
///
/// Type and subtype are compared case-insensitively with `*` as a wildcard;
/// parameters such as `charset` are ignored.
pub fn media_matches(pattern: &Mime, actual: &Mime) -> bool {
    let type_matches = pattern.type_() == mime::STAR || pattern.type_() == actual.type_();
    let subtype_matches =
        pattern.subtype() == mime::STAR || pattern.subtype() == actual.subtype();
    type_matches && subtype_matches
}

/// Ordered set of codecs available to a client.
///
/// The default registry knows JSON, plain text and octet-stream.
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    codecs: Vec<Arc<dyn Codec>>,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::empty()
            .register(JsonCodec)
            .register(TextCodec::plain())
            .register(BinaryCodec)
    }
}

impl CodecRegistry {
    /// Creates a registry with no codecs.
    pub fn empty() -> Self {
        Self { codecs: Vec::new() }
    }

    /// Adds a codec. A codec for an already registered media type replaces it.
    pub fn register(mut self, codec: impl Codec + 'static) -> Self {
        let essence = codec.media_type().essence_str().to_string();
        self.codecs
            .retain(|existing| existing.media_type().essence_str() != essence);
        self.codecs.push(Arc::new(codec));
        self
    }

    /// Returns `true` if no codecs are registered.
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// The registered media types, in registration order.
    pub fn media_types(&self) -> impl Iterator<Item = &Mime> {
        self.codecs.iter().map(|c| c.media_type())
    }

    /// Finds the codec registered for a media type (or pattern).
    pub fn get(&self, media_type: &Mime) -> Option<&dyn Codec> {
        self.codecs
            .iter()
            .find(|c| media_matches(media_type, c.media_type()))
            .map(|c| c.as_ref())
    }

    /// Selects the codec for the first declared media type that has one.
    ///
    /// Returns the content type to send with it: the declared type with its
    /// parameters, or the codec's own type when the declared one is a pattern.
    pub fn encoder_for(&self, declared: &[Mime]) -> Option<(Mime, &dyn Codec)> {
        declared.iter().find_map(|m| {
            let codec = self.get(m)?;
            let content_type = if m.type_() == mime::STAR || m.subtype() == mime::STAR {
                codec.media_type().clone()
            } else {
                m.clone()
            };
            Some((content_type, codec))
        })
    }

    /// Selects the codec decoding a response of type `actual`.
    ///
    /// Declared media types are tried in order; the first one that covers
    /// `actual` and has a registered codec for `actual` wins.
    pub fn decoder_for(&self, declared: &[Mime], actual: &Mime) -> Option<&dyn Codec> {
        declared
            .iter()
            .filter(|m| media_matches(m, actual))
            .find_map(|_| self.get(actual))
    }

    /// Declared media types that this registry can decode, in order.
    ///
    /// Used as the request's `Accept` list.
    pub fn decodable(&self, declared: &[Mime]) -> Vec<Mime> {
        declared
            .iter()
            .filter(|m| self.get(m).is_some())
            .cloned()
            .collect()
    }
}
