//! Encode walk: typed value tree to `{json, meta}` envelope

use crate::transformer::TransformerRegistry;
use crate::validate::check_limits;
use ahash::AHashSet;
use serde_json::{Map, Value as JsonValue};
use sjson_format::envelope::{class_marker, tag_marker};
use sjson_format::{
    join_path, Envelope, MetaValues, Reason, RecordRef, Result, SecurityPolicy, SjsonError, Value,
};
use std::sync::Arc;

/// Per-call encode state.
///
/// Created fresh for every `serialize` call and threaded through the recursion,
/// so concurrent calls on one engine never share bookkeeping.
pub(crate) struct EncodeContext<'a> {
    policy: &'a SecurityPolicy,
    registry: &'a TransformerRegistry,
    meta: MetaValues,
    depth: usize,
    in_flight: AHashSet<usize>,
}

impl<'a> EncodeContext<'a> {
    pub(crate) fn new(policy: &'a SecurityPolicy, registry: &'a TransformerRegistry) -> Self {
        Self {
            policy,
            registry,
            meta: MetaValues::new(),
            depth: 0,
            in_flight: AHashSet::new(),
        }
    }

    /// Number of markers recorded so far
    pub(crate) fn transformations(&self) -> usize {
        self.meta.len()
    }

    pub(crate) fn into_envelope(self, json: JsonValue) -> Envelope {
        Envelope::new(json, self.meta)
    }

    /// Encode one node; depth is restored on every exit path
    pub(crate) fn transform(&mut self, value: &Value, path: &str) -> Result<JsonValue> {
        self.depth += 1;
        let result = self.transform_at_depth(value, path);
        self.depth -= 1;
        result
    }

    fn transform_at_depth(&mut self, value: &Value, path: &str) -> Result<JsonValue> {
        if self.depth > self.policy.max_depth {
            return Err(SjsonError::serialization(
                path,
                Reason::DepthExceeded {
                    limit: self.policy.max_depth,
                },
            ));
        }

        let Value::Record(record) = value else {
            return self.dispatch(value, path);
        };

        let identity = Arc::as_ptr(record) as *const () as usize;
        if !self.in_flight.insert(identity) {
            return Err(SjsonError::serialization(
                path,
                Reason::CircularReference {
                    type_name: record_type_name(record, path)?,
                },
            ));
        }
        let result = self.dispatch(value, path);
        self.in_flight.remove(&identity);
        result
    }

    fn dispatch(&mut self, value: &Value, path: &str) -> Result<JsonValue> {
        if let Some(transformer) = self.registry.find_for(value) {
            let encoded =
                transformer
                    .encode(value)
                    .map_err(|source| SjsonError::SerializationFailed {
                        path: path.to_string(),
                        reason: Reason::Transformer {
                            tag: transformer.tag().to_string(),
                            message: source.to_string(),
                        },
                        source: Some(source),
                    })?;
            check_limits(&encoded, path, self.depth, self.policy).map_err(|breach| {
                SjsonError::serialization(breach.path(), breach.reason(self.policy))
            })?;
            self.meta
                .insert(path.to_string(), tag_marker(transformer.tag()));
            return Ok(encoded);
        }

        match value {
            Value::Null => Ok(JsonValue::Null),
            Value::Bool(b) => Ok(JsonValue::Bool(*b)),
            Value::Number(n) => Ok(JsonValue::Number(n.clone())),
            Value::String(s) => Ok(JsonValue::String(s.clone())),
            Value::Array(items) => {
                self.check_size(items.len(), path)?;
                let mut encoded = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    encoded.push(self.transform(item, &join_path(path, &idx.to_string()))?);
                }
                Ok(JsonValue::Array(encoded))
            }
            Value::Object(fields) => {
                self.check_size(fields.len(), path)?;
                self.transform_fields(fields.iter(), path)
            }
            Value::Record(record) => {
                let (type_name, fields) = snapshot(record, path)?;
                self.check_size(fields.len(), path)?;
                self.meta.insert(path.to_string(), class_marker(&type_name));
                self.transform_fields(fields.iter().map(|(k, v)| (k, v)), path)
            }
            Value::Custom(custom) => Err(SjsonError::serialization(
                path,
                Reason::UnsupportedValue {
                    type_name: custom.type_name().to_string(),
                },
            )),
            other => Err(SjsonError::serialization(
                path,
                Reason::UnsupportedValue {
                    type_name: other.kind().to_string(),
                },
            )),
        }
    }

    fn transform_fields<'v, I>(&mut self, fields: I, path: &str) -> Result<JsonValue>
    where
        I: Iterator<Item = (&'v String, &'v Value)>,
    {
        let mut encoded = Map::new();
        for (key, item) in fields {
            let child = self.transform(item, &join_path(path, key))?;
            encoded.insert(key.clone(), child);
        }
        Ok(JsonValue::Object(encoded))
    }

    fn check_size(&self, size: usize, path: &str) -> Result<()> {
        if size > self.policy.max_collection_size {
            return Err(SjsonError::serialization(
                path,
                Reason::CollectionTooLarge {
                    limit: self.policy.max_collection_size,
                    actual: size,
                },
            ));
        }
        Ok(())
    }
}

/// Copy a record's type name and fields out of its lock so the walk never
/// holds a lock while recursing
fn snapshot(record: &RecordRef, path: &str) -> Result<(String, Vec<(String, Value)>)> {
    let guard = record
        .read()
        .map_err(|poisoned| poisoned_error(poisoned.get_ref().type_name(), path))?;
    let fields = guard
        .fields()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Ok((guard.type_name().to_string(), fields))
}

fn record_type_name(record: &RecordRef, path: &str) -> Result<String> {
    record
        .read()
        .map(|guard| guard.type_name().to_string())
        .map_err(|poisoned| poisoned_error(poisoned.get_ref().type_name(), path))
}

fn poisoned_error(type_name: &str, path: &str) -> SjsonError {
    SjsonError::serialization(
        path,
        Reason::PoisonedRecord {
            type_name: type_name.to_string(),
        },
    )
}
