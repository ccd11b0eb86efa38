//! Restore walk: envelope `json` plus `meta.values` back to typed values

use crate::class_registry::ClassRegistry;
use crate::transformer::TransformerRegistry;
use crate::validate::check_limits;
use serde_json::Value as JsonValue;
use sjson_format::envelope::class_name;
use sjson_format::{join_path, MetaValues, Reason, Result, SecurityPolicy, SjsonError, Value};

/// Per-call restore state
pub(crate) struct RestoreContext<'a> {
    policy: &'a SecurityPolicy,
    registry: &'a TransformerRegistry,
    classes: &'a ClassRegistry,
    meta: &'a MetaValues,
    depth: usize,
}

impl<'a> RestoreContext<'a> {
    pub(crate) fn new(
        policy: &'a SecurityPolicy,
        registry: &'a TransformerRegistry,
        classes: &'a ClassRegistry,
        meta: &'a MetaValues,
    ) -> Self {
        Self {
            policy,
            registry,
            classes,
            meta,
            depth: 0,
        }
    }

    /// Restore one node; depth is restored on every exit path
    pub(crate) fn restore(&mut self, node: &JsonValue, path: &str) -> Result<Value> {
        self.depth += 1;
        let result = self.restore_at_depth(node, path);
        self.depth -= 1;
        result
    }

    fn restore_at_depth(&mut self, node: &JsonValue, path: &str) -> Result<Value> {
        if self.depth > self.policy.max_depth {
            return Err(SjsonError::deserialization(
                path,
                Reason::DepthExceeded {
                    limit: self.policy.max_depth,
                },
            ));
        }

        if let Some(marker) = self.meta.get(path) {
            let tag = marker.first().ok_or_else(|| {
                SjsonError::deserialization(
                    path,
                    Reason::MalformedEnvelope(format!("empty marker for '{}'", path)),
                )
            })?;

            if let Some(transformer) = self.registry.find_by_tag(tag) {
                check_limits(node, path, self.depth, self.policy).map_err(|breach| {
                    SjsonError::deserialization(breach.path(), breach.reason(self.policy))
                })?;
                return transformer.decode(node).map_err(|source| {
                    SjsonError::DeserializationFailed {
                        path: path.to_string(),
                        reason: Reason::Transformer {
                            tag: tag.clone(),
                            message: source.to_string(),
                        },
                        source: Some(source),
                    }
                });
            }

            if let Some(name) = class_name(tag) {
                return self.restore_record(name, node, path);
            }

            tracing::warn!(tag = %tag, path, "unknown type tag; restoring node structurally");
        }

        match node {
            JsonValue::Array(items) => {
                self.check_size(items.len(), path)?;
                let mut restored = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    restored.push(self.restore(item, &join_path(path, &idx.to_string()))?);
                }
                Ok(Value::Array(restored))
            }
            JsonValue::Object(fields) => {
                self.check_size(fields.len(), path)?;
                let mut restored = indexmap::IndexMap::with_capacity(fields.len());
                for (key, item) in fields {
                    restored.insert(key.clone(), self.restore(item, &join_path(path, key))?);
                }
                Ok(Value::Object(restored))
            }
            scalar => Ok(Value::from(scalar.clone())),
        }
    }

    /// Opaque-class restoration through the closed factory registry
    fn restore_record(&mut self, name: &str, node: &JsonValue, path: &str) -> Result<Value> {
        if !self.policy.allow_class_restoration {
            return Err(denied(
                name,
                path,
                "class restoration is disabled; set security.allow_class_restoration to enable it",
            ));
        }
        if let Some(detail) = self.policy.class_refusal(name) {
            return Err(denied(name, path, &detail));
        }

        let mut record = self
            .classes
            .instantiate(name)
            .ok_or_else(|| failed(name, path, "no factory is registered for this class"))?;
        let payload = node
            .as_object()
            .ok_or_else(|| failed(name, path, "payload must be an object"))?;
        self.check_size(payload.len(), path)?;

        for (key, item) in payload {
            if record.has_field(key) {
                let restored = self.restore(item, &join_path(path, key))?;
                record.set(key.clone(), restored);
            }
        }
        Ok(Value::Record(record.into_ref()))
    }

    fn check_size(&self, size: usize, path: &str) -> Result<()> {
        if size > self.policy.max_collection_size {
            return Err(SjsonError::deserialization(
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

fn denied(class: &str, path: &str, detail: &str) -> SjsonError {
    tracing::warn!(class, path, detail, "class restoration denied");
    SjsonError::deserialization(
        path,
        Reason::ClassRestorationDenied {
            class: class.to_string(),
            detail: detail.to_string(),
        },
    )
}

fn failed(class: &str, path: &str, detail: &str) -> SjsonError {
    SjsonError::deserialization(
        path,
        Reason::ClassRestorationFailed {
            class: class.to_string(),
            detail: detail.to_string(),
        },
    )
}
