use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use sjson_codec::{Engine, SecurityPolicy};
use sjson_format::{object, AbsoluteUrl, BigInt, OrderedMap, UniqueSet, Value};

fn create_test_value(count: usize) -> Value {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let items = (0..count)
        .map(|i| {
            let mut tags = UniqueSet::new();
            tags.add_all(["alpha", "beta", if i % 2 == 0 { "even" } else { "odd" }]);
            let mut scores = OrderedMap::new();
            scores.set(i as u64, i * 2);
            object([
                ("id", Value::from(BigInt::from(10_000_000_000_000_000u64 + i as u64))),
                ("created_at", Value::from(base + chrono::Duration::seconds(i as i64))),
                ("tags", Value::from(tags)),
                ("scores", Value::from(scores)),
                (
                    "link",
                    Value::from(AbsoluteUrl::parse(format!("https://example.com/items/{}", i)).unwrap()),
                ),
                ("name", Value::from(format!("item{}", i))),
            ])
        })
        .collect();
    object([("items", Value::Array(items))])
}

fn engine() -> Engine {
    Engine::builder()
        .policy(SecurityPolicy {
            max_collection_size: 100_000,
            ..SecurityPolicy::default()
        })
        .build()
        .unwrap()
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    let engine = engine();

    for count in [10, 100, 1000] {
        let value = create_test_value(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &value, |b, value| {
            b.iter(|| black_box(engine.serialize(black_box(value)).unwrap()));
        });
    }

    group.finish();
}

fn bench_deserialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize");
    let engine = engine();

    for count in [10, 100, 1000] {
        let text = engine.serialize_to_string(&create_test_value(count)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(count), &text, |b, text| {
            b.iter(|| black_box(engine.deserialize(black_box(text)).unwrap()));
        });
    }

    group.finish();
}

fn bench_plain_fallback(c: &mut Criterion) {
    let engine = engine();
    let text = serde_json::to_string(&json!({
        "users": (0..500).map(|i| json!({"id": i, "name": format!("user{}", i)})).collect::<Vec<_>>()
    }))
    .unwrap();

    c.bench_function("deserialize_plain_json", |b| {
        b.iter(|| black_box(engine.deserialize(black_box(&text)).unwrap()));
    });
}

criterion_group!(benches, bench_serialize, bench_deserialize, bench_plain_fallback);
criterion_main!(benches);
