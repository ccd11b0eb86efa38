//! Pre-flight input validation for decode
//!
//! Runs before any restoration work: first on the raw text (size ceiling and
//! a shape sniff), then on the parsed document (envelope `meta` shape, nesting
//! depth and collection sizes). Depth is counted the same way the encode and
//! restore walks count it, one level per visited node with the root at 1.
//! The same limit walk runs over transformer payloads during encode and
//! restore, so the limits hold when `validate_input` is off.

use serde_json::Value as JsonValue;
use sjson_format::constants::{ENVELOPE_JSON_KEY, ENVELOPE_META_KEY, MAX_INPUT_BYTES, META_VALUES_KEY};
use sjson_format::{
    join_path, Envelope, InputViolation, MetaValues, Reason, Result, SecurityPolicy,
};

/// Reject text above the byte ceiling or not starting with `{` or `[`
pub fn validate_text(text: &str) -> Result<()> {
    if text.len() > MAX_INPUT_BYTES {
        return Err(InputViolation::TooLarge {
            size: text.len(),
            limit: MAX_INPUT_BYTES,
        }
        .into());
    }
    let trimmed = text.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return Err(InputViolation::NotStructured.into());
    }
    Ok(())
}

/// Extract `meta.values` from an envelope-shaped document.
///
/// A missing or null `meta` (or `values`) yields an empty map. Anything else
/// must be an object whose `values` maps paths to arrays of one or two strings;
/// the error message says what is wrong.
pub fn parse_meta(document: &JsonValue) -> std::result::Result<MetaValues, String> {
    let meta = match document.get(ENVELOPE_META_KEY) {
        None | Some(JsonValue::Null) => return Ok(MetaValues::new()),
        Some(JsonValue::Object(meta)) => meta,
        Some(_) => return Err("'meta' must be an object".to_string()),
    };
    let values = match meta.get(META_VALUES_KEY) {
        None | Some(JsonValue::Null) => return Ok(MetaValues::new()),
        Some(JsonValue::Object(values)) => values,
        Some(_) => return Err("'meta.values' must be an object".to_string()),
    };

    let mut parsed = MetaValues::with_capacity(values.len());
    for (path, marker) in values {
        let entries = marker
            .as_array()
            .filter(|entries| (1..=2).contains(&entries.len()))
            .ok_or_else(|| {
                format!(
                    "marker for '{}' must be an array of one or two strings",
                    path
                )
            })?;
        let marker = entries
            .iter()
            .map(|entry| entry.as_str().map(str::to_string))
            .collect::<Option<Vec<String>>>()
            .ok_or_else(|| format!("marker for '{}' must contain only strings", path))?;
        parsed.insert(path.clone(), marker);
    }
    Ok(parsed)
}

/// Validate a parsed document against the policy's depth and size limits.
///
/// Every node is walked, including transformer payloads, so a tagged set or
/// error chain meets the same limits as plain JSON.
pub fn validate_document(document: &JsonValue, policy: &SecurityPolicy) -> Result<()> {
    let root = if Envelope::is_envelope_shaped(document) {
        parse_meta(document).map_err(InputViolation::MalformedEnvelope)?;
        match document.get(ENVELOPE_JSON_KEY) {
            Some(json) => json,
            None => return Ok(()),
        }
    } else {
        document
    };
    check_limits(root, "", 1, policy).map_err(|breach| breach.into_violation(policy).into())
}

/// First place a JSON subtree breaks the depth or collection limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LimitBreach {
    Depth { depth: usize, path: String },
    Size { size: usize, path: String },
}

impl LimitBreach {
    pub(crate) fn path(&self) -> &str {
        match self {
            LimitBreach::Depth { path, .. } | LimitBreach::Size { path, .. } => path,
        }
    }

    pub(crate) fn into_violation(self, policy: &SecurityPolicy) -> InputViolation {
        match self {
            LimitBreach::Depth { depth, path } => InputViolation::DepthExceeded {
                depth,
                limit: policy.max_depth,
                path,
            },
            LimitBreach::Size { size, path } => InputViolation::CollectionTooLarge {
                size,
                limit: policy.max_collection_size,
                path,
            },
        }
    }

    pub(crate) fn reason(&self, policy: &SecurityPolicy) -> Reason {
        match self {
            LimitBreach::Depth { .. } => Reason::DepthExceeded {
                limit: policy.max_depth,
            },
            LimitBreach::Size { size, .. } => Reason::CollectionTooLarge {
                limit: policy.max_collection_size,
                actual: *size,
            },
        }
    }
}

/// Walk `node`, sitting at `level`, and every descendant one level deeper
pub(crate) fn check_limits(
    node: &JsonValue,
    path: &str,
    level: usize,
    policy: &SecurityPolicy,
) -> std::result::Result<(), LimitBreach> {
    if level > policy.max_depth {
        return Err(LimitBreach::Depth {
            depth: level,
            path: path.to_string(),
        });
    }

    let size = match node {
        JsonValue::Array(items) => items.len(),
        JsonValue::Object(fields) => fields.len(),
        _ => return Ok(()),
    };
    if size > policy.max_collection_size {
        return Err(LimitBreach::Size {
            size,
            path: path.to_string(),
        });
    }

    match node {
        JsonValue::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                check_limits(item, &join_path(path, &idx.to_string()), level + 1, policy)?;
            }
        }
        JsonValue::Object(fields) => {
            for (key, value) in fields {
                check_limits(value, &join_path(path, key), level + 1, policy)?;
            }
        }
        _ => {}
    }
    Ok(())
}
