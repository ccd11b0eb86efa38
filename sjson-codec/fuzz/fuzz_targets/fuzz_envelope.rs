#![no_main]

use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use serde_json::{json, Map, Value};
use sjson_codec::Engine;

#[derive(Debug, Arbitrary)]
struct MarkedNode {
    path: Vec<u8>,
    tag: u8,
    payload: Vec<u8>,
}

const TAGS: &[&str] = &[
    "Date", "bigint", "set", "map", "regexp", "URL", "Error", "class:App\\User", "class:PDO", "",
];

/// Well-formed envelopes with hostile markers: every tag paired with payloads
/// of the wrong shape, at paths that may or may not exist.
fuzz_target!(|nodes: Vec<MarkedNode>| {
    let mut json = Map::new();
    let mut values = Map::new();
    for node in nodes.iter().take(32) {
        let path: String = node
            .path
            .iter()
            .take(8)
            .map(|b| char::from(b'a' + b % 4))
            .collect();
        let payload = match serde_json::from_slice::<Value>(&node.payload) {
            Ok(value) => value,
            Err(_) => Value::String(String::from_utf8_lossy(&node.payload).into_owned()),
        };
        let tag = TAGS[usize::from(node.tag) % TAGS.len()];
        json.insert(path.clone(), payload);
        values.insert(path, json!([tag]));
    }

    let envelope = json!({"json": json, "meta": {"values": values}});
    let _ = Engine::new().deserialize_json(envelope);
});
