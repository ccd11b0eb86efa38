//! Dynamic value tree carrying JSON values and typed wrappers

use crate::bigint::BigInt;
use crate::collections::{OrderedMap, UniqueSet};
use crate::pattern::Pattern;
use crate::structured_error::StructuredError;
use crate::uri::AbsoluteUrl;
use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;
use serde_json::{Number, Value as JsonValue};
use std::any::Any;
use std::fmt;
use std::sync::{Arc, RwLock};

/// Application value handled by a custom transformer
pub trait CustomValue: Any + fmt::Debug + Send + Sync {
    /// Type name used in diagnostics
    fn type_name(&self) -> &str;

    /// Access for downcasting in a transformer's `recognize`/`encode`
    fn as_any(&self) -> &dyn Any;
}

/// Opaque structured object: a type name plus ordered fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    type_name: String,
    fields: IndexMap<String, Value>,
}

/// Shared handle to a record; records are the only values with identity
pub type RecordRef = Arc<RwLock<Record>>;

impl Record {
    /// Create a record with no fields
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field declaration
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Type name
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Set a field, declaring it if needed
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Field value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Whether the field is declared
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    /// Wrap in a shared handle
    pub fn into_ref(self) -> RecordRef {
        Arc::new(RwLock::new(self))
    }
}

/// Any value the engine can encode
#[derive(Debug, Clone)]
pub enum Value {
    /// JSON null
    Null,
    /// JSON boolean
    Bool(bool),
    /// JSON number
    Number(Number),
    /// JSON string
    String(String),
    /// JSON array
    Array(Vec<Value>),
    /// JSON object, insertion-ordered
    Object(IndexMap<String, Value>),
    /// Date/time instant
    Date(DateTime<FixedOffset>),
    /// Arbitrary-precision integer
    BigInt(BigInt),
    /// Deduplicated item list
    Set(UniqueSet),
    /// Ordered key/value list
    Map(OrderedMap),
    /// Regular-expression pattern
    Regex(Pattern),
    /// Absolute URL
    Url(AbsoluteUrl),
    /// Structured error
    Error(StructuredError),
    /// Opaque structured object
    Record(RecordRef),
    /// Application value
    Custom(Arc<dyn CustomValue>),
}

impl Value {
    /// Short type label
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Date(_) => "date",
            Value::BigInt(_) => "bigint",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Regex(_) => "regexp",
            Value::Url(_) => "url",
            Value::Error(_) => "error",
            Value::Record(_) => "record",
            Value::Custom(_) => "custom",
        }
    }

    /// Record handle, if this is a record
    pub fn as_record(&self) -> Option<&RecordRef> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// String slice, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Array elements, if this is an array
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Object fields, if this is an object
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Object field or array element by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Big integer, if this is one
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(big) => Some(big),
            _ => None,
        }
    }

    /// Date, if this is one
    pub fn as_date(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Date(date) => Some(date),
            _ => None,
        }
    }

    /// Set, if this is one
    pub fn as_set(&self) -> Option<&UniqueSet> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Map, if this is one
    pub fn as_map(&self) -> Option<&OrderedMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Pattern, if this is one
    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            Value::Regex(pattern) => Some(pattern),
            _ => None,
        }
    }

    /// URL, if this is one
    pub fn as_url(&self) -> Option<&AbsoluteUrl> {
        match self {
            Value::Url(url) => Some(url),
            _ => None,
        }
    }

    /// Structured error, if this is one
    pub fn as_error(&self) -> Option<&StructuredError> {
        match self {
            Value::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Custom value downcast to `T`
    pub fn downcast_custom<T: 'static>(&self) -> Option<&T> {
        match self {
            Value::Custom(custom) => custom.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Regex(a), Value::Regex(b)) => a == b,
            (Value::Url(a), Value::Url(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => {
                if Arc::ptr_eq(a, b) {
                    return true;
                }
                match (a.read(), b.read()) {
                    (Ok(a), Ok(b)) => *a == *b,
                    _ => false,
                }
            }
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Number(n),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(fields: IndexMap<String, Value>) -> Self {
        Value::Object(fields)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::Date(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value.fixed_offset())
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<UniqueSet> for Value {
    fn from(value: UniqueSet) -> Self {
        Value::Set(value)
    }
}

impl From<OrderedMap> for Value {
    fn from(value: OrderedMap) -> Self {
        Value::Map(value)
    }
}

impl From<Pattern> for Value {
    fn from(value: Pattern) -> Self {
        Value::Regex(value)
    }
}

impl From<AbsoluteUrl> for Value {
    fn from(value: AbsoluteUrl) -> Self {
        Value::Url(value)
    }
}

impl From<StructuredError> for Value {
    fn from(value: StructuredError) -> Self {
        Value::Error(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Record(value.into_ref())
    }
}

impl From<RecordRef> for Value {
    fn from(value: RecordRef) -> Self {
        Value::Record(value)
    }
}

impl<T: Into<Value>> FromIterator<(String, T)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

/// Build an object value from `(key, value)` pairs
pub fn object<K, V, I>(pairs: I) -> Value
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    Value::Object(
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
    )
}
