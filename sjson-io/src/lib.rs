//! SJSON I/O - Collaborators at the edge of the engine
//!
//! This crate provides the pieces an application wires around the engine:
//!
//! - TOML configuration for the transformer list and security policy
//! - Request/response boundary helpers driven by content-type signals
//! - HTML-escaped envelopes for inline embedding
//! - Tracing subscriber setup

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod boundary;
pub mod config;
pub mod html;
pub mod observability;

// Re-export commonly used types
pub use sjson_codec::{ClassRegistry, Engine, EngineBuilder};
pub use sjson_format::{Result, SecurityPolicy, SjsonError, Value};

// Re-export our own types
pub use boundary::{
    decode_inbound, encode_outbound, is_superjson_media_type, ContentSignal, InboundBody,
    OutboundBody, SUPERJSON_MEDIA_TYPE,
};
pub use config::SjsonConfig;
pub use html::{escape_html, to_html};
pub use observability::init_tracing;
