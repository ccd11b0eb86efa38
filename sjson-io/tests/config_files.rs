//! Configuration files driving a real engine

use chrono::{TimeZone, Utc};
use sjson_io::{
    decode_inbound, encode_outbound, ClassRegistry, ContentSignal, SjsonConfig, SjsonError, Value,
};
use sjson_format::{object, Record};
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, text: &str) -> std::path::PathBuf {
    let path = dir.path().join("sjson.toml");
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn file_configures_limits_and_classes() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
transformers = ["Date", "bigint"]

[security]
max_depth = 4
allow_class_restoration = true
allowed_classes = ["Invoice"]
"#,
    );

    let config = SjsonConfig::from_path(&path).unwrap();
    let mut classes = ClassRegistry::new();
    classes
        .register("Invoice", || {
            Record::new("Invoice")
                .with_field("number", Value::Null)
                .with_field("issued", Value::Null)
        })
        .unwrap();
    let engine = config.build_engine(classes).unwrap();

    let issued = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let invoice = Value::from(
        Record::new("Invoice")
            .with_field("number", "INV-7")
            .with_field("issued", issued),
    );
    let text = engine.serialize_to_string(&invoice).unwrap();
    assert_eq!(engine.deserialize(&text).unwrap(), invoice);

    let too_deep = object([("a", object([("b", object([("c", object([("d", 1)]))]))]))]);
    assert!(engine.serialize(&too_deep).is_err());
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = SjsonConfig::from_path(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SjsonError::SecurityViolation(ref msg) if msg.contains("absent.toml")));
}

#[test]
fn unsafe_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[security]\nmax_collection_size = 5000000\n");
    assert!(matches!(
        SjsonConfig::from_path(&path),
        Err(SjsonError::SecurityViolation(_))
    ));
}

#[test]
fn boundary_round_trip_with_configured_engine() {
    let engine = SjsonConfig::default()
        .build_engine(ClassRegistry::new())
        .unwrap();
    let signal = ContentSignal {
        content_type: Some("application/superjson".to_string()),
        accept: Some("application/superjson".to_string()),
        explicit_flag: false,
    };

    let value = object([("when", Value::from(Utc.with_ymd_and_hms(2020, 5, 5, 5, 5, 5).unwrap()))]);
    let outbound = encode_outbound(&engine, &signal, &value).unwrap().unwrap();
    let inbound = decode_inbound(&engine, &signal, &outbound.body).unwrap();
    assert_eq!(inbound.data, value);
}
