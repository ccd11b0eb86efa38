//! Round-trip tests over the public engine API

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value as JsonValue};
use sjson_codec::{Engine, Transformer, TransformerRegistry, TypeTag, ValueError};
use sjson_format::{
    object, AbsoluteUrl, BigInt, CustomValue, ErrorCode, OrderedMap, Pattern, Reason,
    StructuredError, UniqueSet, Value,
};
use std::any::Any;
use std::sync::Arc;

fn round_trip(value: &Value) -> Value {
    let engine = Engine::new();
    let text = engine.serialize_to_string(value).unwrap();
    engine.deserialize(&text).unwrap()
}

#[test]
fn big_number_scenario() {
    let engine = Engine::new();
    let value = object([(
        "big_number",
        BigInt::new("12345678901234567890").unwrap(),
    )]);

    let envelope = engine.serialize(&value).unwrap();
    assert_eq!(envelope.json["big_number"], json!("12345678901234567890"));
    assert_eq!(
        envelope.marker("big_number"),
        Some(&vec!["bigint".to_string()])
    );

    let restored = engine.deserialize_envelope(&envelope).unwrap();
    let big = restored.get("big_number").and_then(Value::as_bigint).unwrap();
    assert_eq!(big.as_str(), "12345678901234567890");
}

#[test]
fn wire_shape_is_exact() {
    let engine = Engine::new();
    let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
    let value = object([("created_at", Value::from(date)), ("title", Value::from("x"))]);
    let text = engine.serialize_to_string(&value).unwrap();
    assert_eq!(
        text,
        r#"{"json":{"created_at":"2024-01-15T10:30:00+00:00","title":"x"},"meta":{"values":{"created_at":["Date"]}}}"#
    );
}

#[test]
fn plain_values_have_no_meta() {
    let engine = Engine::new();
    let text = engine
        .serialize_to_string(&Value::from(json!({"a": [1, 2, {"b": null}]})))
        .unwrap();
    assert_eq!(text, r#"{"json":{"a":[1,2,{"b":null}]}}"#);
}

#[test]
fn every_builtin_type_round_trips() {
    let date: DateTime<Utc> = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
    let mut map = OrderedMap::new();
    map.set(1, "one");
    map.set("1", "string one");
    map.set(json!({"nested": true}), json!([1, 2]));
    let set: UniqueSet = ["apple", "banana", "apple", "cherry"].into_iter().collect();
    let error = StructuredError::new("RuntimeException", "boom", ErrorCode::Int(42), "src/lib.rs", 10)
        .with_previous(StructuredError::new("InvalidArgumentException", "bad", ErrorCode::Text("E1".into()), "src/a.rs", 2));

    let value = object([
        ("date", Value::from(date)),
        ("big", Value::from(BigInt::new("-987654321098765432109876543210").unwrap())),
        ("set", Value::from(set)),
        ("map", Value::from(map)),
        ("pattern", Value::from(Pattern::new("^\\d+/x$", "gi").unwrap())),
        ("url", Value::from(AbsoluteUrl::parse("https://user:pw@example.com:8443/p?q=1#f").unwrap())),
        ("error", Value::from(error)),
        ("plain", Value::from(json!({"n": 1.5, "s": "text", "b": false, "z": null}))),
    ]);

    assert_eq!(round_trip(&value), value);
}

#[test]
fn nested_paths_round_trip() {
    let value = object([(
        "users",
        Value::Array(vec![
            object([("id", BigInt::from(1i64))]),
            object([("id", BigInt::from(2i64))]),
        ]),
    )]);
    let envelope = Engine::new().serialize(&value).unwrap();
    let paths: Vec<String> = envelope.values().keys().cloned().collect();
    assert_eq!(paths, vec!["users.0.id", "users.1.id"]);
    assert_eq!(round_trip(&value), value);
}

#[test]
fn root_wrapper_round_trips() {
    let value = Value::from(Pattern::new("a+", "").unwrap());
    let envelope = Engine::new().serialize(&value).unwrap();
    assert_eq!(envelope.json, json!("/a+/"));
    assert_eq!(envelope.marker(""), Some(&vec!["regexp".to_string()]));
    assert_eq!(Engine::new().deserialize_envelope(&envelope).unwrap(), value);
}

#[test]
fn set_deduplicates() {
    let mut set = UniqueSet::new();
    set.add_all(["apple", "banana", "apple", "cherry"]);
    assert_eq!(set.len(), 3);
    for item in ["apple", "banana", "cherry"] {
        assert!(set.has(&json!(item)));
    }
    assert_eq!(set.items(), &[json!("apple"), json!("banana"), json!("cherry")]);

    let restored = round_trip(&Value::from(set.clone()));
    assert_eq!(restored.as_set(), Some(&set));
}

#[test]
fn long_digit_strings_come_back_as_bigint() {
    let value = object([("account", "0000123456789012345")]);
    let restored = round_trip(&value);
    let big = restored.get("account").and_then(Value::as_bigint).unwrap();
    assert_eq!(big.as_str(), "0000123456789012345");

    let short = object([("zip", "123456789012345")]);
    assert_eq!(round_trip(&short), short);
}

#[test]
fn plain_json_fallback() {
    let engine = Engine::new();
    let value = engine.deserialize(r#"{"name":"John","age":30}"#).unwrap();
    assert_eq!(value, Value::from(json!({"name": "John", "age": 30})));

    let array = engine.deserialize("[1, \"two\", null]").unwrap();
    assert_eq!(array, Value::from(json!([1, "two", null])));
}

#[test]
fn key_order_is_preserved() {
    let value = Value::from(json!({"z": 1, "a": 2, "m": {"y": 3, "b": 4}}));
    let text = Engine::new().serialize_to_string(&value).unwrap();
    assert_eq!(text, r#"{"json":{"z":1,"a":2,"m":{"y":3,"b":4}}}"#);
}

#[derive(Debug)]
struct Money {
    cents: i64,
    currency: String,
}

impl CustomValue for Money {
    fn type_name(&self) -> &str {
        "Money"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct MoneyTransformer;

impl Transformer for MoneyTransformer {
    fn tag(&self) -> &str {
        "money"
    }

    fn recognize(&self, value: &Value) -> bool {
        value.downcast_custom::<Money>().is_some()
    }

    fn encode(&self, value: &Value) -> Result<JsonValue, ValueError> {
        let money = value
            .downcast_custom::<Money>()
            .ok_or_else(|| ValueError::MalformedPayload {
                tag: "money".to_string(),
                reason: "not money".to_string(),
            })?;
        Ok(json!([money.cents, money.currency]))
    }

    fn decode(&self, payload: &JsonValue) -> Result<Value, ValueError> {
        match payload.as_array().map(Vec::as_slice) {
            Some([JsonValue::Number(cents), JsonValue::String(currency)]) => {
                Ok(Value::Custom(Arc::new(Money {
                    cents: cents.as_i64().unwrap_or_default(),
                    currency: currency.clone(),
                })))
            }
            _ => Err(ValueError::MalformedPayload {
                tag: "money".to_string(),
                reason: "expected [cents, currency]".to_string(),
            }),
        }
    }
}

#[test]
fn custom_transformer_is_appended() {
    let engine = Engine::builder()
        .transformer(Arc::new(MoneyTransformer))
        .build()
        .unwrap();
    assert_eq!(engine.registry().len(), 8);

    let value = object([(
        "price",
        Value::Custom(Arc::new(Money {
            cents: 1999,
            currency: "EUR".to_string(),
        })),
    )]);
    let envelope = engine.serialize(&value).unwrap();
    assert_eq!(envelope.json, json!({"price": [1999, "EUR"]}));
    assert_eq!(envelope.marker("price"), Some(&vec!["money".to_string()]));

    let restored = engine.deserialize_envelope(&envelope).unwrap();
    let money = restored
        .get("price")
        .and_then(Value::downcast_custom::<Money>)
        .unwrap();
    assert_eq!(money.cents, 1999);
    assert_eq!(money.currency, "EUR");
}

#[test]
fn custom_value_without_transformer_is_unsupported() {
    let value = Value::Custom(Arc::new(Money {
        cents: 1,
        currency: "USD".to_string(),
    }));
    let err = Engine::new().serialize(&value).unwrap_err();
    assert!(matches!(
        err.reason(),
        Some(Reason::UnsupportedValue { type_name }) if type_name == "Money"
    ));
}

#[test]
fn configured_list_replaces_defaults() {
    let registry: TransformerRegistry = [TypeTag::BigInt]
        .into_iter()
        .map(sjson_codec::builtin)
        .collect();
    let engine = Engine::builder().transformers(registry).build().unwrap();
    assert_eq!(engine.registry().tags(), vec!["bigint"]);

    let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert!(engine.serialize(&Value::from(date)).is_err());

    // a Date marker is unknown to this engine and falls through
    let restored = engine
        .deserialize(r#"{"json":{"d":"2024-01-01T00:00:00+00:00"},"meta":{"values":{"d":["Date"]}}}"#)
        .unwrap();
    assert_eq!(restored.get("d"), Some(&Value::from("2024-01-01T00:00:00+00:00")));
}
