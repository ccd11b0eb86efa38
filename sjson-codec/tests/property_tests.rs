//! Property-based round-trip tests for the engine

use proptest::prelude::*;
use serde_json::{Map, Value as JsonValue};
use sjson_codec::{Engine, SecurityPolicy};
use sjson_format::{object, BigInt, Pattern, UniqueSet, Value};

/// Plain JSON without long digit strings, so no value is reclassified as bigint
fn plain_json() -> impl Strategy<Value = JsonValue> {
    let leaf = prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::Bool),
        any::<i64>().prop_map(JsonValue::from),
        "[a-zA-Z ]{0,12}".prop_map(JsonValue::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(JsonValue::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6).prop_map(|pairs| {
                JsonValue::Object(pairs.into_iter().collect::<Map<String, JsonValue>>())
            }),
        ]
    })
}

fn big_digits() -> impl Strategy<Value = String> {
    "-?[1-9][0-9]{0,60}"
}

proptest! {
    #[test]
    fn plain_json_round_trips_without_meta(document in plain_json()) {
        let engine = Engine::new();
        let value = Value::from(document.clone());
        let envelope = engine.serialize(&value).unwrap();
        prop_assert!(envelope.meta.is_none());
        prop_assert_eq!(&envelope.json, &document);
        prop_assert_eq!(engine.deserialize_envelope(&envelope).unwrap(), value);
    }

    #[test]
    fn bigints_round_trip_exactly(digits in big_digits()) {
        let engine = Engine::new();
        let value = object([("n", BigInt::new(digits.clone()).unwrap())]);
        let text = engine.serialize_to_string(&value).unwrap();
        let restored = engine.deserialize(&text).unwrap();
        let big = restored.get("n").and_then(Value::as_bigint).unwrap();
        prop_assert_eq!(big.as_str(), digits.as_str());
    }

    #[test]
    fn sets_round_trip_in_first_occurrence_order(items in prop::collection::vec(0i64..50, 0..60)) {
        let engine = Engine::new();
        let set: UniqueSet = items.iter().copied().collect();
        let restored = engine
            .deserialize(&engine.serialize_to_string(&Value::from(set.clone())).unwrap())
            .unwrap();
        prop_assert_eq!(restored.as_set(), Some(&set));
    }

    #[test]
    fn patterns_round_trip(source in "[a-z0-9/.*+?^$]{0,16}", flags in prop::sample::subsequence(vec!['g', 'i', 'm', 's', 'u', 'y'], 0..6)) {
        let engine = Engine::new();
        let flags: String = flags.into_iter().collect();
        let value = Value::from(Pattern::new(source, flags).unwrap());
        let envelope = engine.serialize(&value).unwrap();
        prop_assert_eq!(engine.deserialize_envelope(&envelope).unwrap(), value);
    }

    #[test]
    fn arbitrary_text_never_panics(text in "\\PC{0,200}") {
        let engine = Engine::builder()
            .policy(SecurityPolicy { validate_input: false, ..SecurityPolicy::default() })
            .build()
            .unwrap();
        let _ = engine.deserialize(&text);
        let _ = Engine::new().deserialize(&text);
    }
}
