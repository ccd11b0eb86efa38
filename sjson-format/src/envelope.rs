//! Envelope wire structure and path helpers

use crate::constants::{CLASS_MARKER_PREFIX, ENVELOPE_JSON_KEY};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One- or two-element marker: `[typeTag]` or `["class:Name"]`
pub type Marker = Vec<String>;

/// Path-to-marker map in pre-order of the encode walk
pub type MetaValues = IndexMap<String, Marker>;

/// `meta` section of an envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Path-to-marker map
    pub values: MetaValues,
}

/// `{json, meta}` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// JSON-legal shadow of the encoded value
    pub json: JsonValue,
    /// Present only when at least one transformation happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Envelope {
    /// Assemble an envelope, omitting `meta` when no transformation was recorded
    pub fn new(json: JsonValue, values: MetaValues) -> Self {
        let meta = if values.is_empty() {
            None
        } else {
            Some(Meta { values })
        };
        Self { json, meta }
    }

    /// Marker recorded for `path`
    pub fn marker(&self, path: &str) -> Option<&Marker> {
        self.meta.as_ref().and_then(|m| m.values.get(path))
    }

    /// Recorded markers, empty when there is no `meta`
    pub fn values(&self) -> MetaValues {
        self.meta
            .as_ref()
            .map(|m| m.values.clone())
            .unwrap_or_default()
    }

    /// Whether a plain JSON document has the envelope shape (`json` key on an object)
    pub fn is_envelope_shaped(document: &JsonValue) -> bool {
        document
            .as_object()
            .is_some_and(|fields| fields.contains_key(ENVELOPE_JSON_KEY))
    }
}

/// Marker for a transformer tag
pub fn tag_marker(tag: &str) -> Marker {
    vec![tag.to_string()]
}

/// Marker for an opaque class
pub fn class_marker(type_name: &str) -> Marker {
    vec![format!("{}{}", CLASS_MARKER_PREFIX, type_name)]
}

/// Class name carried by a class marker tag
pub fn class_name(tag: &str) -> Option<&str> {
    tag.strip_prefix(CLASS_MARKER_PREFIX)
}

/// Extend `parent` with one key or index segment
pub fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", parent, segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn meta_is_omitted_when_empty() {
        let envelope = Envelope::new(json!({"a": 1}), MetaValues::new());
        assert_eq!(
            serde_json::to_string(&envelope).unwrap(),
            r#"{"json":{"a":1}}"#
        );
    }

    #[test]
    fn meta_serializes_as_values_map() {
        let mut values = MetaValues::new();
        values.insert("user.created_at".to_string(), tag_marker("Date"));
        values.insert("user".to_string(), class_marker("App\\User"));
        let envelope = Envelope::new(json!({}), values);
        let text = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            text["meta"]["values"],
            json!({"user.created_at": ["Date"], "user": ["class:App\\User"]})
        );
    }

    #[test]
    fn paths_join_with_dots() {
        assert_eq!(join_path("", "user"), "user");
        assert_eq!(join_path("user", "roles"), "user.roles");
        assert_eq!(join_path("items.0", "id"), "items.0.id");
    }

    #[test]
    fn envelope_shape_detection() {
        assert!(Envelope::is_envelope_shaped(&json!({"json": null})));
        assert!(!Envelope::is_envelope_shaped(&json!({"name": "John"})));
        assert!(!Envelope::is_envelope_shaped(&json!(["json"])));
        assert_eq!(class_name("class:Foo"), Some("Foo"));
        assert_eq!(class_name("Date"), None);
    }
}
