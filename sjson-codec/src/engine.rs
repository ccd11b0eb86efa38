//! Engine: configured entry point for `serialize` and `deserialize`

use crate::class_registry::ClassRegistry;
use crate::decode::RestoreContext;
use crate::encode::EncodeContext;
use crate::transformer::{Transformer, TransformerRegistry};
use crate::validate::{parse_meta, validate_document, validate_text};
use serde_json::Value as JsonValue;
use sjson_format::constants::ENVELOPE_JSON_KEY;
use sjson_format::{Envelope, Reason, Record, Result, SecurityPolicy, SjsonError, Value};
use std::sync::Arc;

/// SuperJSON-compatible encoder/decoder.
///
/// Holds only read-only configuration; every call builds its own walk state,
/// so one engine can be shared across threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    policy: SecurityPolicy,
    registry: TransformerRegistry,
    classes: ClassRegistry,
}

impl Engine {
    /// Engine with the default policy and the seven built-in transformers
    pub fn new() -> Self {
        Self::default()
    }

    /// Start configuring an engine
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Active security policy
    pub fn policy(&self) -> &SecurityPolicy {
        &self.policy
    }

    /// Active transformers, in lookup order
    pub fn registry(&self) -> &TransformerRegistry {
        &self.registry
    }

    /// Restorable record types
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Encode a value into an envelope
    pub fn serialize(&self, value: &Value) -> Result<Envelope> {
        let mut ctx = EncodeContext::new(&self.policy, &self.registry);
        let json = ctx.transform(value, "")?;
        tracing::debug!(
            transformations = ctx.transformations(),
            "serialized value"
        );
        Ok(ctx.into_envelope(json))
    }

    /// Encode a value and render the envelope as compact JSON text
    pub fn serialize_to_string(&self, value: &Value) -> Result<String> {
        let envelope = self.serialize(value)?;
        serde_json::to_string(&envelope)
            .map_err(|e| SjsonError::serialization("", Reason::InvalidJson(e.to_string())))
    }

    /// Decode JSON text: an envelope, or plain JSON returned as-is
    pub fn deserialize(&self, text: &str) -> Result<Value> {
        if self.policy.validate_input {
            validate_text(text)?;
        }
        let document: JsonValue = serde_json::from_str(text)
            .map_err(|e| SjsonError::deserialization("", Reason::InvalidJson(e.to_string())))?;
        self.deserialize_json(document)
    }

    /// Decode an already parsed document
    pub fn deserialize_json(&self, document: JsonValue) -> Result<Value> {
        if self.policy.validate_input && (document.is_object() || document.is_array()) {
            validate_document(&document, &self.policy)?;
        }

        if !Envelope::is_envelope_shaped(&document) {
            tracing::debug!("input has no envelope shape; returning plain JSON");
            return Ok(Value::from(document));
        }

        let meta = parse_meta(&document)
            .map_err(|message| SjsonError::deserialization("", Reason::MalformedEnvelope(message)))?;
        let json = document.get(ENVELOPE_JSON_KEY).unwrap_or(&JsonValue::Null);

        let mut ctx = RestoreContext::new(&self.policy, &self.registry, &self.classes, &meta);
        let value = ctx.restore(json, "")?;
        tracing::debug!(markers = meta.len(), "restored envelope");
        Ok(value)
    }

    /// Decode a typed envelope
    pub fn deserialize_envelope(&self, envelope: &Envelope) -> Result<Value> {
        let document = serde_json::to_value(envelope)
            .map_err(|e| SjsonError::deserialization("", Reason::InvalidJson(e.to_string())))?;
        self.deserialize_json(document)
    }

    /// Run input validation only, whatever `validate_input` says
    pub fn validate(&self, text: &str) -> Result<()> {
        validate_text(text)?;
        let document: JsonValue = serde_json::from_str(text)
            .map_err(|e| SjsonError::deserialization("", Reason::InvalidJson(e.to_string())))?;
        validate_document(&document, &self.policy)
    }
}

/// Builder for [`Engine`]
#[derive(Debug, Default)]
pub struct EngineBuilder {
    policy: SecurityPolicy,
    registry: TransformerRegistry,
    classes: ClassRegistry,
    pending: Option<SjsonError>,
}

impl EngineBuilder {
    /// Set the security policy
    pub fn policy(mut self, policy: SecurityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the transformer list
    pub fn transformers(mut self, registry: TransformerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Append a transformer after those already configured
    pub fn transformer(mut self, transformer: Arc<dyn Transformer>) -> Self {
        self.registry.push(transformer);
        self
    }

    /// Replace the class registry
    pub fn classes(mut self, classes: ClassRegistry) -> Self {
        self.classes = classes;
        self
    }

    /// Register a record factory for class-marker restoration
    pub fn class<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Record + Send + Sync + 'static,
    {
        if let Err(err) = self.classes.register(name, factory) {
            self.pending.get_or_insert(err);
        }
        self
    }

    /// Validate the configuration and build the engine
    ///
    /// # Errors
    ///
    /// Returns `SecurityViolation` if the policy is out of bounds or a class
    /// factory was registered under a denied name.
    pub fn build(self) -> Result<Engine> {
        if let Some(err) = self.pending {
            return Err(err);
        }
        self.policy.validate()?;
        Ok(Engine {
            policy: self.policy,
            registry: self.registry,
            classes: self.classes,
        })
    }
}
