//! Inline HTML embedding

use sjson_codec::Engine;
use sjson_format::{Result, Value};

/// Serialize `value` and escape the envelope text for safe inline embedding
pub fn to_html(engine: &Engine, value: &Value) -> Result<String> {
    let text = engine.serialize_to_string(value)?;
    Ok(escape_html(&text))
}

/// Escape `& < > " '` as HTML entities
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}
