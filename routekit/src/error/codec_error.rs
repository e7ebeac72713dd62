//! Body encoding and decoding errors.

use thiserror::Error;

/// Errors raised by codecs and by the conversion between typed values and
/// the codec pivot value.
#[derive(Debug, Error)]
pub enum CodecError {
    /// JSON serialization or parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization or parsing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A text body was not valid UTF-8.
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The codec cannot represent this kind of value.
    #[error("{media_type} cannot represent {kind} values")]
    UnsupportedValue {
        /// The codec's media type.
        media_type: String,
        /// The JSON kind that was rejected (`object`, `array`, ...).
        kind: &'static str,
    },

    /// No declared media type both matches the response and has a decoder.
    #[error("No decoder among declared media types [{declared}]")]
    NoMatchingCodec {
        /// The declared media types, comma separated.
        declared: String,
    },
}

impl CodecError {
    /// Returns `true` if the body was read but its content was malformed.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Json(_) | Self::Yaml(_) | Self::Utf8(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_is_parse_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = CodecError::from(json_err);
        assert!(err.is_parse_error());
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_unsupported_value_display() {
        let err = CodecError::UnsupportedValue {
            media_type: "text/plain".to_string(),
            kind: "object",
        };
        assert_eq!(err.to_string(), "text/plain cannot represent object values");
        assert!(!err.is_parse_error());
    }

    #[test]
    fn test_no_matching_codec_display() {
        let err = CodecError::NoMatchingCodec {
            declared: "application/json, text/plain".to_string(),
        };
        assert!(err.to_string().contains("application/json, text/plain"));
    }
}
