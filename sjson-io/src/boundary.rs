//! Request/response boundary helpers
//!
//! Framework-neutral versions of the middleware hooks: decide from headers or
//! an explicit flag whether a body is SuperJSON, decode inbound bodies with
//! log-and-continue semantics, and encode outbound values.

use serde_json::Value as JsonValue;
use sjson_codec::validate::validate_text;
use sjson_codec::Engine;
use sjson_format::{Reason, Result, SjsonError, Value};

/// Content type set on encoded responses
pub const SUPERJSON_MEDIA_TYPE: &str = "application/superjson";

const RECOGNIZED_MEDIA_TYPES: [&str; 2] = ["application/superjson", "application/sjson"];

/// Whether a header value names a SuperJSON media type anywhere in it
pub fn is_superjson_media_type(header: &str) -> bool {
    let header = header.to_ascii_lowercase();
    RECOGNIZED_MEDIA_TYPES
        .iter()
        .any(|media_type| header.contains(media_type))
}

/// What the caller knows about a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSignal {
    /// `Content-Type` header of the request
    pub content_type: Option<String>,
    /// `Accept` header of the request
    pub accept: Option<String>,
    /// Caller-side opt-in, such as a `_superjson` request parameter
    pub explicit_flag: bool,
}

impl ContentSignal {
    /// Whether the request body should be decoded
    pub fn is_superjson_request(&self) -> bool {
        self.explicit_flag
            || self
                .content_type
                .as_deref()
                .is_some_and(is_superjson_media_type)
    }

    /// Whether the response body should be encoded
    pub fn accepts_superjson(&self) -> bool {
        self.explicit_flag || self.accept.as_deref().is_some_and(is_superjson_media_type)
    }
}

/// Decoded request body
#[derive(Debug, Clone, PartialEq)]
pub struct InboundBody {
    /// Restored value
    pub data: Value,
    /// Body as plain parsed JSON, before restoration
    pub original: JsonValue,
}

/// Encoded response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundBody {
    /// Envelope as JSON text
    pub body: String,
    /// Response content type
    pub content_type: &'static str,
}

/// Decode a request body if the signal says it is SuperJSON.
///
/// Returns `None` when the request is not SuperJSON, the body is empty, or
/// decoding fails. Failures are logged without the body itself.
pub fn decode_inbound(engine: &Engine, signal: &ContentSignal, body: &str) -> Option<InboundBody> {
    if !signal.is_superjson_request() || body.is_empty() {
        return None;
    }

    let decoded = parse_inbound(engine, body).and_then(|original| {
        let data = engine.deserialize_json(original.clone())?;
        Ok(InboundBody { data, original })
    });

    match decoded {
        Ok(inbound) => Some(inbound),
        Err(err) => {
            tracing::warn!(
                code = err.code(),
                error = %err,
                content_length = body.len(),
                content_type = signal.content_type.as_deref().unwrap_or(""),
                "SuperJSON deserialization failed"
            );
            None
        }
    }
}

/// Parse the body once; the engine restores from a copy of this document
fn parse_inbound(engine: &Engine, body: &str) -> Result<JsonValue> {
    if engine.policy().validate_input {
        validate_text(body)?;
    }
    serde_json::from_str(body)
        .map_err(|e| SjsonError::deserialization("", Reason::InvalidJson(e.to_string())))
}

/// Encode a response value if the client asked for SuperJSON.
///
/// Returns `Ok(None)` when the client did not ask, or the value is null.
pub fn encode_outbound(
    engine: &Engine,
    signal: &ContentSignal,
    value: &Value,
) -> Result<Option<OutboundBody>> {
    if !signal.accepts_superjson() || matches!(value, Value::Null) {
        return Ok(None);
    }
    let body = engine.serialize_to_string(value)?;
    Ok(Some(OutboundBody {
        body,
        content_type: SUPERJSON_MEDIA_TYPE,
    }))
}
