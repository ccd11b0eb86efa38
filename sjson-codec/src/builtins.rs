//! Built-in transformers for the seven wire type tags

use crate::transformer::Transformer;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat};
use serde_json::Value as JsonValue;
use sjson_format::bigint::is_integer_text;
use sjson_format::constants::{
    BIGINT_HEURISTIC_MIN_DIGITS, TAG_BIGINT, TAG_DATE, TAG_ERROR, TAG_MAP, TAG_REGEXP, TAG_SET,
    TAG_URL,
};
use sjson_format::structured_error::structured_error_from_json;
use sjson_format::{AbsoluteUrl, BigInt, OrderedMap, Pattern, UniqueSet, Value, ValueError};

fn malformed(tag: &str, reason: impl Into<String>) -> ValueError {
    ValueError::MalformedPayload {
        tag: tag.to_string(),
        reason: reason.into(),
    }
}

fn unexpected(tag: &str, value: &Value) -> ValueError {
    malformed(tag, format!("cannot encode a {} value", value.kind()))
}

fn expect_str<'a>(tag: &str, payload: &'a JsonValue) -> Result<&'a str, ValueError> {
    payload
        .as_str()
        .ok_or_else(|| malformed(tag, "expected a string"))
}

fn expect_array<'a>(tag: &str, payload: &'a JsonValue) -> Result<&'a Vec<JsonValue>, ValueError> {
    payload
        .as_array()
        .ok_or_else(|| malformed(tag, "expected an array"))
}

/// Whether a plain string looks like a big integer (`^-?\d{16,}$`).
///
/// This is a heuristic: a long numeric identifier sent as a string is
/// classified as `bigint` too, and comes back as a `BigInt` on decode.
pub fn looks_like_bigint(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    digits.len() >= BIGINT_HEURISTIC_MIN_DIGITS && is_integer_text(s)
}

/// `Date`: RFC 3339 text
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTransformer;

impl Transformer for DateTransformer {
    fn tag(&self) -> &str {
        TAG_DATE
    }

    fn recognize(&self, value: &Value) -> bool {
        matches!(value, Value::Date(_))
    }

    fn encode(&self, value: &Value) -> Result<JsonValue, ValueError> {
        match value {
            Value::Date(date) => Ok(JsonValue::String(
                date.to_rfc3339_opts(SecondsFormat::AutoSi, false),
            )),
            other => Err(unexpected(TAG_DATE, other)),
        }
    }

    fn decode(&self, payload: &JsonValue) -> Result<Value, ValueError> {
        let text = expect_str(TAG_DATE, payload)?;
        parse_date(text).map(Value::Date)
    }
}

/// RFC 3339 first; timestamps without an offset are read as UTC
fn parse_date(text: &str) -> Result<DateTime<chrono::FixedOffset>, ValueError> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Ok(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| ValueError::InvalidDate(text.to_string()))
}

/// `bigint`: decimal digit string
#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntTransformer;

impl Transformer for BigIntTransformer {
    fn tag(&self) -> &str {
        TAG_BIGINT
    }

    fn recognize(&self, value: &Value) -> bool {
        match value {
            Value::BigInt(_) => true,
            Value::String(s) => looks_like_bigint(s),
            _ => false,
        }
    }

    fn encode(&self, value: &Value) -> Result<JsonValue, ValueError> {
        match value {
            Value::BigInt(big) => Ok(JsonValue::String(big.as_str().to_string())),
            Value::String(s) => Ok(JsonValue::String(s.clone())),
            other => Err(unexpected(TAG_BIGINT, other)),
        }
    }

    fn decode(&self, payload: &JsonValue) -> Result<Value, ValueError> {
        let big = match payload {
            JsonValue::String(s) => BigInt::new(s.as_str())?,
            JsonValue::Number(n) if n.is_i64() || n.is_u64() => BigInt::new(n.to_string())?,
            other => return Err(ValueError::InvalidBigInt(other.to_string())),
        };
        Ok(Value::BigInt(big))
    }
}

/// `set`: array of unique items
#[derive(Debug, Clone, Copy, Default)]
pub struct SetTransformer;

impl Transformer for SetTransformer {
    fn tag(&self) -> &str {
        TAG_SET
    }

    fn recognize(&self, value: &Value) -> bool {
        matches!(value, Value::Set(_))
    }

    fn encode(&self, value: &Value) -> Result<JsonValue, ValueError> {
        match value {
            Value::Set(set) => Ok(JsonValue::Array(set.items().to_vec())),
            other => Err(unexpected(TAG_SET, other)),
        }
    }

    fn decode(&self, payload: &JsonValue) -> Result<Value, ValueError> {
        let items = expect_array(TAG_SET, payload)?;
        Ok(Value::Set(items.iter().cloned().collect::<UniqueSet>()))
    }
}

/// `map`: array of `[key, value]` pairs
#[derive(Debug, Clone, Copy, Default)]
pub struct MapTransformer;

impl Transformer for MapTransformer {
    fn tag(&self) -> &str {
        TAG_MAP
    }

    fn recognize(&self, value: &Value) -> bool {
        matches!(value, Value::Map(_))
    }

    fn encode(&self, value: &Value) -> Result<JsonValue, ValueError> {
        match value {
            Value::Map(map) => Ok(JsonValue::Array(
                map.iter()
                    .map(|(k, v)| JsonValue::Array(vec![k.clone(), v.clone()]))
                    .collect(),
            )),
            other => Err(unexpected(TAG_MAP, other)),
        }
    }

    fn decode(&self, payload: &JsonValue) -> Result<Value, ValueError> {
        let entries = expect_array(TAG_MAP, payload)?;
        let mut pairs = Vec::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            match entry.as_array().map(Vec::as_slice) {
                Some([key, value]) => pairs.push((key.clone(), value.clone())),
                _ => {
                    return Err(malformed(
                        TAG_MAP,
                        format!("entry {} is not a [key, value] pair", idx),
                    ))
                }
            }
        }
        Ok(Value::Map(OrderedMap::from_entries(pairs)))
    }
}

/// `regexp`: `/source/flags` text
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexpTransformer;

impl Transformer for RegexpTransformer {
    fn tag(&self) -> &str {
        TAG_REGEXP
    }

    fn recognize(&self, value: &Value) -> bool {
        matches!(value, Value::Regex(_))
    }

    fn encode(&self, value: &Value) -> Result<JsonValue, ValueError> {
        match value {
            Value::Regex(pattern) => Ok(JsonValue::String(pattern.to_string())),
            other => Err(unexpected(TAG_REGEXP, other)),
        }
    }

    fn decode(&self, payload: &JsonValue) -> Result<Value, ValueError> {
        let text = expect_str(TAG_REGEXP, payload)?;
        Ok(Value::Regex(Pattern::parse(text)))
    }
}

/// `URL`: original URL text
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlTransformer;

impl Transformer for UrlTransformer {
    fn tag(&self) -> &str {
        TAG_URL
    }

    fn recognize(&self, value: &Value) -> bool {
        matches!(value, Value::Url(_))
    }

    fn encode(&self, value: &Value) -> Result<JsonValue, ValueError> {
        match value {
            Value::Url(url) => Ok(JsonValue::String(url.as_str().to_string())),
            other => Err(unexpected(TAG_URL, other)),
        }
    }

    fn decode(&self, payload: &JsonValue) -> Result<Value, ValueError> {
        let text = expect_str(TAG_URL, payload)?;
        AbsoluteUrl::parse(text).map(Value::Url)
    }
}

/// `Error`: structured error object with a nested `previous` chain
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorTransformer;

impl Transformer for ErrorTransformer {
    fn tag(&self) -> &str {
        TAG_ERROR
    }

    fn recognize(&self, value: &Value) -> bool {
        matches!(value, Value::Error(_))
    }

    fn encode(&self, value: &Value) -> Result<JsonValue, ValueError> {
        match value {
            Value::Error(error) => {
                serde_json::to_value(error).map_err(|e| malformed(TAG_ERROR, e.to_string()))
            }
            other => Err(unexpected(TAG_ERROR, other)),
        }
    }

    fn decode(&self, payload: &JsonValue) -> Result<Value, ValueError> {
        if !payload.is_object() {
            return Err(malformed(TAG_ERROR, "expected an object"));
        }
        structured_error_from_json(payload)
            .map(Value::Error)
            .map_err(|e| malformed(TAG_ERROR, e.to_string()))
    }
}
