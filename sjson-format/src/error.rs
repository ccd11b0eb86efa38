//! Error types for SJSON

use thiserror::Error;

/// Numeric code for encode-time failures.
pub const CODE_SERIALIZATION_FAILED: u16 = 1001;
/// Numeric code for decode-time failures.
pub const CODE_DESERIALIZATION_FAILED: u16 = 1002;
/// Numeric code for pre-flight input validation failures.
pub const CODE_INVALID_INPUT: u16 = 1003;
/// Numeric code for invalid or unsafe configuration.
pub const CODE_SECURITY_VIOLATION: u16 = 1004;
/// Numeric code for refused opaque-class restoration.
pub const CODE_CLASS_RESTORATION_DENIED: u16 = 1005;
/// Numeric code for failures raised by a transformer.
pub const CODE_TRANSFORMER_ERROR: u16 = 1006;

/// Errors raised while constructing, operating on, or decoding a typed value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Text is not a decimal integer.
    #[error("Invalid BigInt value: '{0}'")]
    InvalidBigInt(String),
    /// Division or modulo by zero.
    #[error("Division by zero")]
    DivisionByZero,
    /// Value does not fit the requested native integer type.
    #[error("BigInt value is too large for int conversion: {0}")]
    IntegerOverflow(String),
    /// Text is not an absolute URL.
    #[error("Invalid URL: {url} ({reason})")]
    InvalidUrl {
        /// The rejected text
        url: String,
        /// Parser explanation
        reason: String,
    },
    /// Pattern source could not be compiled.
    #[error("Invalid pattern /{source_text}/: {reason}")]
    InvalidPattern {
        /// Pattern source
        source_text: String,
        /// Compiler explanation
        reason: String,
    },
    /// Flag string contains unknown or repeated flags.
    #[error("Invalid pattern flags: '{0}'")]
    InvalidFlags(String),
    /// Text is not an RFC 3339 timestamp.
    #[error("Invalid date: '{0}'")]
    InvalidDate(String),
    /// A transformer payload does not have the expected shape.
    #[error("Malformed {tag} payload: {reason}")]
    MalformedPayload {
        /// Type tag of the transformer that rejected the payload
        tag: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Why an encode or decode walk stopped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Reason {
    /// Nesting went past the configured depth limit.
    #[error("maximum depth {limit} exceeded")]
    DepthExceeded {
        /// Configured limit
        limit: usize,
    },
    /// A record was reached again while it was still being encoded.
    #[error("circular reference detected in {type_name}")]
    CircularReference {
        /// Type name of the record that closes the cycle
        type_name: String,
    },
    /// A collection holds more elements than allowed.
    #[error("collection of {actual} elements exceeds limit {limit}")]
    CollectionTooLarge {
        /// Configured limit
        limit: usize,
        /// Element count found
        actual: usize,
    },
    /// A transformer rejected the value or payload.
    #[error("transformer '{tag}' failed: {message}")]
    Transformer {
        /// Type tag of the failing transformer
        tag: String,
        /// Transformer message
        message: String,
    },
    /// No transformer recognizes an application value.
    #[error("no transformer recognizes value of type {type_name}")]
    UnsupportedValue {
        /// Type name reported by the value
        type_name: String,
    },
    /// Text input is not JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    /// The envelope or its `meta` section is malformed.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
    /// Policy refused to restore a class marker.
    #[error("class restoration denied for '{class}': {detail}")]
    ClassRestorationDenied {
        /// Class name from the marker
        class: String,
        /// Which check refused it
        detail: String,
    },
    /// Class restoration was allowed but could not complete.
    #[error("class restoration failed for '{class}': {detail}")]
    ClassRestorationFailed {
        /// Class name from the marker
        class: String,
        /// What went wrong
        detail: String,
    },
    /// A record lock was poisoned by a panicking writer.
    #[error("record '{type_name}' is poisoned")]
    PoisonedRecord {
        /// Type name of the record
        type_name: String,
    },
}

/// Pre-flight validation failures raised before any restoration work
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputViolation {
    /// Text input is above the byte ceiling.
    #[error("input of {size} bytes exceeds limit of {limit} bytes")]
    TooLarge {
        /// Input size in bytes
        size: usize,
        /// Byte ceiling
        limit: usize,
    },
    /// Text does not start like a JSON object or array.
    #[error("input does not appear to be a JSON object or array")]
    NotStructured,
    /// Document nesting is deeper than allowed.
    #[error("input nesting depth {depth} exceeds limit {limit} at '{path}'")]
    DepthExceeded {
        /// Depth reached
        depth: usize,
        /// Configured limit
        limit: usize,
        /// Where the limit was crossed
        path: String,
    },
    /// A collection in the document is larger than allowed.
    #[error("input collection of {size} elements exceeds limit {limit} at '{path}'")]
    CollectionTooLarge {
        /// Element count found
        size: usize,
        /// Configured limit
        limit: usize,
        /// Location of the collection
        path: String,
    },
    /// Envelope `meta` section has the wrong shape.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
}

/// SJSON error types
#[derive(Debug, Error)]
pub enum SjsonError {
    /// Encode-time failure.
    #[error("Serialization failed at '{path}': {reason}")]
    SerializationFailed {
        /// Path of the value being encoded
        path: String,
        /// What stopped the walk
        reason: Reason,
        /// Underlying value error, if any
        #[source]
        source: Option<ValueError>,
    },
    /// Decode-time failure.
    #[error("Deserialization failed at '{path}': {reason}")]
    DeserializationFailed {
        /// Path of the node being restored
        path: String,
        /// What stopped the walk
        reason: Reason,
        /// Underlying value error, if any
        #[source]
        source: Option<ValueError>,
    },
    /// Pre-flight validation failure.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputViolation),
    /// Configuration is invalid or unsafe.
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl SjsonError {
    /// Encode-time failure without an underlying value error.
    pub fn serialization(path: impl Into<String>, reason: Reason) -> Self {
        SjsonError::SerializationFailed {
            path: path.into(),
            reason,
            source: None,
        }
    }

    /// Decode-time failure without an underlying value error.
    pub fn deserialization(path: impl Into<String>, reason: Reason) -> Self {
        SjsonError::DeserializationFailed {
            path: path.into(),
            reason,
            source: None,
        }
    }

    /// Numeric error code, stable across implementations
    pub fn code(&self) -> u16 {
        match self {
            SjsonError::SerializationFailed { reason, .. } => match reason {
                Reason::Transformer { .. } => CODE_TRANSFORMER_ERROR,
                _ => CODE_SERIALIZATION_FAILED,
            },
            SjsonError::DeserializationFailed { reason, .. } => match reason {
                Reason::Transformer { .. } => CODE_TRANSFORMER_ERROR,
                Reason::ClassRestorationDenied { .. } => CODE_CLASS_RESTORATION_DENIED,
                _ => CODE_DESERIALIZATION_FAILED,
            },
            SjsonError::InvalidInput(_) => CODE_INVALID_INPUT,
            SjsonError::SecurityViolation(_) => CODE_SECURITY_VIOLATION,
        }
    }

    /// Path where the failure happened, when the walk knows it
    pub fn path(&self) -> Option<&str> {
        match self {
            SjsonError::SerializationFailed { path, .. }
            | SjsonError::DeserializationFailed { path, .. } => Some(path),
            SjsonError::InvalidInput(InputViolation::DepthExceeded { path, .. })
            | SjsonError::InvalidInput(InputViolation::CollectionTooLarge { path, .. }) => {
                Some(path)
            }
            _ => None,
        }
    }

    /// Walk reason for encode/decode failures
    pub fn reason(&self) -> Option<&Reason> {
        match self {
            SjsonError::SerializationFailed { reason, .. }
            | SjsonError::DeserializationFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SjsonError>;
