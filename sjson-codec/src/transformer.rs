//! Transformer trait and ordered registry
//!
//! A transformer recognizes one value shape that JSON cannot carry natively and
//! converts it to and from a JSON-legal payload. The registry is an ordered
//! list: encode asks each transformer in turn and uses the first one that
//! recognizes the value, decode uses the first one whose tag matches the marker.
//!
//! # Example
//!
//! ```rust
//! use sjson_codec::transformer::{Transformer, TransformerRegistry};
//! use sjson_format::{Value, ValueError};
//! use serde_json::{json, Value as JsonValue};
//! use std::sync::Arc;
//!
//! struct Upper;
//!
//! impl Transformer for Upper {
//!     fn tag(&self) -> &str {
//!         "upper"
//!     }
//!
//!     fn recognize(&self, value: &Value) -> bool {
//!         value.as_str().is_some_and(|s| s.starts_with("UP:"))
//!     }
//!
//!     fn encode(&self, value: &Value) -> Result<JsonValue, ValueError> {
//!         Ok(json!(value.as_str().unwrap_or_default()))
//!     }
//!
//!     fn decode(&self, payload: &JsonValue) -> Result<Value, ValueError> {
//!         Ok(Value::from(payload.clone()))
//!     }
//! }
//!
//! let mut registry = TransformerRegistry::with_defaults();
//! registry.push(Arc::new(Upper));
//! assert_eq!(registry.len(), 8);
//! ```

use crate::builtins::{
    BigIntTransformer, DateTransformer, ErrorTransformer, MapTransformer, RegexpTransformer,
    SetTransformer, UrlTransformer,
};
use serde_json::Value as JsonValue;
use sjson_format::{TypeTag, Value, ValueError};
use std::fmt;
use std::sync::Arc;

/// Capability set for one non-JSON-native type
pub trait Transformer: Send + Sync {
    /// Wire tag recorded in `meta.values`
    fn tag(&self) -> &str;

    /// Whether this transformer handles `value`
    fn recognize(&self, value: &Value) -> bool;

    /// Convert a recognized value to its JSON-legal payload
    fn encode(&self, value: &Value) -> Result<JsonValue, ValueError>;

    /// Rebuild the typed value from its payload
    fn decode(&self, payload: &JsonValue) -> Result<Value, ValueError>;
}

/// Built-in transformer for a type tag
pub fn builtin(tag: TypeTag) -> Arc<dyn Transformer> {
    match tag {
        TypeTag::Date => Arc::new(DateTransformer),
        TypeTag::BigInt => Arc::new(BigIntTransformer),
        TypeTag::Set => Arc::new(SetTransformer),
        TypeTag::Map => Arc::new(MapTransformer),
        TypeTag::Regexp => Arc::new(RegexpTransformer),
        TypeTag::Url => Arc::new(UrlTransformer),
        TypeTag::Error => Arc::new(ErrorTransformer),
    }
}

/// Ordered list of transformers; read-only once handed to an engine
#[derive(Clone)]
pub struct TransformerRegistry {
    transformers: Vec<Arc<dyn Transformer>>,
}

impl TransformerRegistry {
    /// Registry holding the seven built-ins in default order
    pub fn with_defaults() -> Self {
        Self {
            transformers: TypeTag::ALL.iter().map(|tag| builtin(*tag)).collect(),
        }
    }

    /// Registry with no transformers
    pub fn empty() -> Self {
        Self {
            transformers: Vec::new(),
        }
    }

    /// Append a transformer; it is tried after every one already registered
    pub fn push(&mut self, transformer: Arc<dyn Transformer>) {
        if self.find_by_tag(transformer.tag()).is_some() {
            tracing::warn!(
                tag = transformer.tag(),
                "duplicate transformer tag; decode uses the first registration"
            );
        }
        self.transformers.push(transformer);
    }

    /// First transformer that recognizes `value`
    pub fn find_for(&self, value: &Value) -> Option<&Arc<dyn Transformer>> {
        self.transformers.iter().find(|t| t.recognize(value))
    }

    /// First transformer registered under `tag`
    pub fn find_by_tag(&self, tag: &str) -> Option<&Arc<dyn Transformer>> {
        self.transformers.iter().find(|t| t.tag() == tag)
    }

    /// Tags in registration order
    pub fn tags(&self) -> Vec<&str> {
        self.transformers.iter().map(|t| t.tag()).collect()
    }

    /// Number of registered transformers
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Iterate transformers in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Transformer>> {
        self.transformers.iter()
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl FromIterator<Arc<dyn Transformer>> for TransformerRegistry {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Transformer>>>(iter: I) -> Self {
        let mut registry = Self::empty();
        for transformer in iter {
            registry.push(transformer);
        }
        registry
    }
}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}
