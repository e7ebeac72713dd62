//! Built-in codecs.
//!
//! Each codec handles one media type. Structured formats (JSON, YAML) map
//! directly onto the pivot value; text and binary formats only accept the
//! value kinds they can represent.

use bytes::Bytes;
use mime::Mime;
use serde_json::Value;

use super::Codec;
use crate::error::CodecError;

static APPLICATION_JSON: Mime = mime::APPLICATION_JSON;
static APPLICATION_OCTET_STREAM: Mime = mime::APPLICATION_OCTET_STREAM;

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn unsupported(media_type: &Mime, value: &Value) -> CodecError {
    CodecError::UnsupportedValue {
        media_type: media_type.essence_str().to_string(),
        kind: kind_of(value),
    }
}

/// `application/json` codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn media_type(&self) -> &Mime {
        &APPLICATION_JSON
    }

    fn encode(&self, value: &Value) -> Result<Bytes, CodecError> {
        Ok(Bytes::from(serde_json::to_vec(value)?))
    }

    fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// `application/yaml` codec.
#[derive(Debug, Clone)]
pub struct YamlCodec {
    media_type: Mime,
}

impl Default for YamlCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl YamlCodec {
    /// Creates the YAML codec.
    pub fn new() -> Self {
        Self {
            media_type: "application/yaml"
                .parse()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM),
        }
    }
}

impl Codec for YamlCodec {
    fn media_type(&self) -> &Mime {
        &self.media_type
    }

    fn encode(&self, value: &Value) -> Result<Bytes, CodecError> {
        Ok(Bytes::from(serde_yaml::to_string(value)?))
    }

    fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
        Ok(serde_yaml::from_slice(body)?)
    }
}

/// UTF-8 text codec for `text/plain`, `text/html`, `text/csv` and friends.
///
/// Strings are written verbatim; numbers and booleans are written in their
/// JSON spelling. Decoding always yields a string.
#[derive(Debug, Clone)]
pub struct TextCodec {
    media_type: Mime,
}

impl TextCodec {
    /// Creates a text codec for an arbitrary text media type.
    pub fn new(media_type: Mime) -> Self {
        Self { media_type }
    }

    /// `text/plain`.
    pub fn plain() -> Self {
        Self::new(mime::TEXT_PLAIN)
    }

    /// `text/html`.
    pub fn html() -> Self {
        Self::new(mime::TEXT_HTML)
    }

    /// `text/csv`.
    pub fn csv() -> Self {
        Self::new(mime::TEXT_CSV)
    }
}

impl Codec for TextCodec {
    fn media_type(&self) -> &Mime {
        &self.media_type
    }

    fn encode(&self, value: &Value) -> Result<Bytes, CodecError> {
        match value {
            Value::String(s) => Ok(Bytes::from(s.clone())),
            Value::Number(n) => Ok(Bytes::from(n.to_string())),
            Value::Bool(b) => Ok(Bytes::from(b.to_string())),
            other => Err(unsupported(&self.media_type, other)),
        }
    }

    fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
        Ok(Value::String(String::from_utf8(body.to_vec())?))
    }
}

/// `application/octet-stream` codec.
///
/// Encodes byte arrays (as produced by serializing `Vec<u8>`) and strings;
/// decodes to a byte array that deserializes back into `Vec<u8>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl Codec for BinaryCodec {
    fn media_type(&self) -> &Mime {
        &APPLICATION_OCTET_STREAM
    }

    fn encode(&self, value: &Value) -> Result<Bytes, CodecError> {
        match value {
            Value::String(s) => Ok(Bytes::from(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|n| u8::try_from(n).ok())
                        .ok_or_else(|| unsupported(self.media_type(), item))
                })
                .collect::<Result<Vec<u8>, _>>()
                .map(Bytes::from),
            other => Err(unsupported(self.media_type(), other)),
        }
    }

    fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
        Ok(Value::Array(body.iter().map(|b| Value::from(*b)).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_json_decode() {
        let value = JsonCodec.decode(br#"{"name": "test", "value": 42}"#).unwrap();
        let data: TestData = serde_json::from_value(value).unwrap();
        assert_eq!(
            data,
            TestData {
                name: "test".to_string(),
                value: 42
            }
        );
    }

    #[test]
    fn test_json_decode_error() {
        let err = JsonCodec.decode(b"not valid json").unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }

    #[test]
    fn test_yaml_round_trip() {
        let codec = YamlCodec::new();
        assert_eq!(codec.media_type().essence_str(), "application/yaml");
        let value = json!({"name": "test", "value": 42, "tags": ["a", "b"]});
        let bytes = codec.encode(&value).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), value);
    }

    #[test]
    fn test_text_encode() {
        let codec = TextCodec::plain();
        assert_eq!(codec.encode(&json!("hello")).unwrap().as_ref(), b"hello");
        assert_eq!(codec.encode(&json!(12)).unwrap().as_ref(), b"12");
        assert!(matches!(
            codec.encode(&json!({"a": 1})),
            Err(CodecError::UnsupportedValue { kind: "object", .. })
        ));
    }

    #[test]
    fn test_text_decode_invalid_utf8() {
        let err = TextCodec::html().decode(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, CodecError::Utf8(_)));
    }

    #[test]
    fn test_text_variants() {
        assert_eq!(TextCodec::csv().media_type(), &mime::TEXT_CSV);
        assert_eq!(TextCodec::html().media_type(), &mime::TEXT_HTML);
    }

    #[test]
    fn test_binary_round_trip_bytes() {
        let raw: Vec<u8> = vec![0, 1, 127, 255];
        let value = serde_json::to_value(&raw).unwrap();
        let bytes = BinaryCodec.encode(&value).unwrap();
        assert_eq!(bytes.as_ref(), raw.as_slice());
        let back: Vec<u8> = serde_json::from_value(BinaryCodec.decode(&bytes).unwrap()).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_binary_rejects_out_of_range() {
        assert!(BinaryCodec.encode(&json!([1, 256])).is_err());
        assert!(BinaryCodec.encode(&json!({"a": 1})).is_err());
    }
}
