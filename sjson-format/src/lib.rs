//! SJSON Format - Core primitives for SuperJSON-compatible envelopes
//!
//! This crate provides the data model shared by the engine and its
//! collaborators, with no engine logic or I/O. It includes:
//!
//! - Wire constants and type tags
//! - Typed value wrappers (big integers, patterns, URLs, ordered maps,
//!   deduplicated sets, structured errors)
//! - The dynamic `Value` tree
//! - Envelope types and path helpers
//! - Error types
//! - Security policy

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod bigint;
pub mod collections;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod limits;
pub mod pattern;
pub mod structured_error;
pub mod types;
pub mod uri;
pub mod value;

// Re-export commonly used types
pub use bigint::BigInt;
pub use collections::{OrderedMap, UniqueSet};
pub use envelope::{join_path, Envelope, Marker, Meta, MetaValues};
pub use error::{InputViolation, Reason, Result, SjsonError, ValueError};
pub use limits::SecurityPolicy;
pub use pattern::Pattern;
pub use structured_error::{ErrorCode, StructuredError, TraceFrame};
pub use types::TypeTag;
pub use uri::AbsoluteUrl;
pub use value::{object, CustomValue, Record, RecordRef, Value};
