#![no_main]

use libfuzzer_sys::fuzz_target;
use sjson_codec::{Engine, SecurityPolicy, SjsonError};

/// Arbitrary text through the full decode path: validation, parsing and restore.
/// Must never panic; every rejection is a typed error.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let strict = Engine::new();
    check(&strict, text);

    let lenient = Engine::builder()
        .policy(SecurityPolicy {
            validate_input: false,
            allow_class_restoration: true,
            ..SecurityPolicy::default()
        })
        .build()
        .expect("valid policy");
    check(&lenient, text);
});

fn check(engine: &Engine, text: &str) {
    match engine.deserialize(text) {
        Ok(value) => {
            // whatever decoded must encode again under the same limits or fail cleanly
            let _ = engine.serialize(&value);
        }
        Err(err) => {
            assert!((1001..=1006).contains(&err.code()));
            if let SjsonError::InvalidInput(_) = err {
                assert!(engine.policy().validate_input);
            }
        }
    }
}
