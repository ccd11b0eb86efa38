//! SJSON Codec - Transformation engine
//!
//! This crate provides the encode and decode walks for SuperJSON-compatible
//! envelopes:
//!
//! - Transformer trait and ordered registry
//! - Built-in transformers for the seven wire type tags
//! - Closed registry of restorable record types
//! - Pre-flight input validation
//! - The `Engine` tying them together under a security policy
//!
//! # Example
//!
//! ```rust
//! use sjson_codec::Engine;
//! use sjson_format::{object, BigInt, Value};
//!
//! let engine = Engine::new();
//! let value = object([("big_number", BigInt::new("12345678901234567890").unwrap())]);
//! let envelope = engine.serialize(&value).unwrap();
//! assert_eq!(envelope.json["big_number"], "12345678901234567890");
//!
//! let restored = engine.deserialize_envelope(&envelope).unwrap();
//! assert_eq!(restored, value);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod builtins;
pub mod class_registry;
mod decode;
mod encode;
pub mod engine;
pub mod transformer;
pub mod validate;

// Re-export commonly used types
pub use sjson_format::{
    Envelope, InputViolation, Reason, Result, SecurityPolicy, SjsonError, TypeTag, Value,
    ValueError,
};

// Re-export our own types
pub use class_registry::{ClassRegistry, RecordFactory};
pub use engine::{Engine, EngineBuilder};
pub use transformer::{builtin, Transformer, TransformerRegistry};
