//! Round-trip properties of the shipped codecs.

use proptest::prelude::*;
use routekit::codec::{BinaryCodec, JsonCodec, TextCodec, YamlCodec};
use routekit::{Codec, CodecRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Record {
    id: u32,
    name: String,
    tags: Vec<String>,
    active: bool,
}

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        any::<u32>(),
        "[a-zA-Z0-9 ]{0,24}",
        prop::collection::vec("[a-z]{1,8}", 0..5),
        any::<bool>(),
    )
        .prop_map(|(id, name, tags, active)| Record {
            id,
            name,
            tags,
            active,
        })
}

fn round_trip<T>(codec: &dyn Codec, value: &T) -> T
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let pivot = serde_json::to_value(value).unwrap();
    let bytes = codec.encode(&pivot).unwrap();
    serde_json::from_value(codec.decode(&bytes).unwrap()).unwrap()
}

proptest! {
    #[test]
    fn json_round_trips_records(record in record_strategy()) {
        prop_assert_eq!(round_trip(&JsonCodec, &record), record);
    }

    #[test]
    fn yaml_round_trips_records(record in record_strategy()) {
        prop_assert_eq!(round_trip(&YamlCodec::new(), &record), record);
    }

    #[test]
    fn text_round_trips_strings(text in "\\PC{0,64}") {
        prop_assert_eq!(round_trip(&TextCodec::plain(), &text), text);
    }

    #[test]
    fn binary_round_trips_bytes(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        prop_assert_eq!(round_trip(&BinaryCodec, &bytes), bytes);
    }
}

#[test]
fn test_default_registry_media_types() {
    let registry = CodecRegistry::default();
    let media_types: Vec<&str> = registry.media_types().map(|m| m.essence_str()).collect();
    assert_eq!(
        media_types,
        vec!["application/json", "text/plain", "application/octet-stream"]
    );
}

#[test]
fn test_registering_same_media_type_replaces() {
    let registry = CodecRegistry::empty()
        .register(TextCodec::plain())
        .register(TextCodec::new(mime::TEXT_PLAIN_UTF_8));
    assert_eq!(registry.media_types().count(), 1);
}

#[test]
fn test_text_rejects_structured_values() {
    let err = TextCodec::plain()
        .encode(&serde_json::json!([1, 2]))
        .unwrap_err();
    assert_eq!(err.to_string(), "text/plain cannot represent array values");
    assert!(JsonCodec.decode(b"").is_err());
    assert_eq!(TextCodec::plain().decode(b"").unwrap(), Value::String(String::new()));
}
