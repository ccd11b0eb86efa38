//! Structured error value with a bounded trace and a cause chain

use crate::constants::MAX_TRACE_FRAMES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;

/// Numeric or textual error code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    /// Numeric code
    Int(i64),
    /// Textual code
    Text(String),
}

impl Default for ErrorCode {
    fn default() -> Self {
        ErrorCode::Int(0)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Int(code) => write!(f, "{}", code),
            ErrorCode::Text(code) => f.write_str(code),
        }
    }
}

/// One frame of a captured trace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceFrame {
    /// Source file, `[internal]` when unknown
    pub file: String,
    /// Line number, 0 when unknown
    pub line: u32,
    /// Function name
    pub function: String,
    /// Owning type, empty for free functions
    pub class: String,
    /// Call kind (`->`, `::` or empty)
    #[serde(rename = "type")]
    pub kind: String,
}

/// Serializable error with origin, trace and optional cause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredError {
    name: String,
    message: String,
    #[serde(default)]
    code: ErrorCode,
    file: String,
    line: u32,
    #[serde(default)]
    trace: Vec<TraceFrame>,
    previous: Option<Box<StructuredError>>,
}

impl StructuredError {
    /// Create an error with an empty trace and no cause
    pub fn new(
        name: impl Into<String>,
        message: impl Into<String>,
        code: ErrorCode,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            code,
            file: file.into(),
            line,
            trace: Vec::new(),
            previous: None,
        }
    }

    /// Capture a Rust error: its type name, message, the caller location and its source chain
    #[track_caller]
    pub fn from_error<E>(err: &E) -> Self
    where
        E: std::error::Error + 'static,
    {
        let location = Location::caller();
        let mut captured = Self::new(
            std::any::type_name::<E>(),
            err.to_string(),
            ErrorCode::default(),
            location.file(),
            location.line(),
        );
        captured.previous = err
            .source()
            .map(|source| Box::new(Self::from_source(source, location)));
        captured
    }

    fn from_source(err: &(dyn std::error::Error + 'static), location: &Location<'_>) -> Self {
        let mut captured = Self::new(
            "Error",
            err.to_string(),
            ErrorCode::default(),
            location.file(),
            location.line(),
        );
        captured.previous = err
            .source()
            .map(|source| Box::new(Self::from_source(source, location)));
        captured
    }

    /// Attach a trace, keeping at most the first ten frames
    pub fn with_trace(mut self, trace: impl IntoIterator<Item = TraceFrame>) -> Self {
        self.trace = trace.into_iter().take(MAX_TRACE_FRAMES).collect();
        self
    }

    /// Attach a cause
    pub fn with_previous(mut self, previous: StructuredError) -> Self {
        self.previous = Some(Box::new(previous));
        self
    }

    /// Error type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Error code
    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    /// File where the error originated
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Line where the error originated
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Captured trace frames
    pub fn trace(&self) -> &[TraceFrame] {
        &self.trace
    }

    /// Cause, if any
    pub fn previous(&self) -> Option<&StructuredError> {
        self.previous.as_deref()
    }

    /// Iterate this error and its causes, outermost first
    pub fn chain(&self) -> impl Iterator<Item = &StructuredError> {
        std::iter::successors(Some(self), |e| e.previous())
    }

    /// Truncate an over-long trace, including the traces of every cause
    pub(crate) fn clamp_traces(&mut self) {
        self.trace.truncate(MAX_TRACE_FRAMES);
        if let Some(previous) = self.previous.as_mut() {
            previous.clamp_traces();
        }
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} in {}:{}",
            self.name, self.message, self.file, self.line
        )?;
        if let Some(previous) = &self.previous {
            write!(f, "\nPrevious: {}", previous)?;
        }
        Ok(())
    }
}

impl std::error::Error for StructuredError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.previous
            .as_deref()
            .map(|p| p as &(dyn std::error::Error + 'static))
    }
}

/// Decode a structured error payload, bounding every trace
pub fn structured_error_from_json(
    payload: &serde_json::Value,
) -> Result<StructuredError, serde_json::Error> {
    let mut error = StructuredError::deserialize(payload)?;
    error.clamp_traces();
    Ok(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("disk full")
        }
    }

    impl std::error::Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("save failed")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn from_error_captures_chain_and_location() {
        let err = StructuredError::from_error(&Outer(Inner));
        assert!(err.name().ends_with("Outer"));
        assert_eq!(err.message(), "save failed");
        assert!(err.file().ends_with("structured_error.rs"));
        assert!(err.line() > 0);
        let messages: Vec<&str> = err.chain().map(|e| e.message()).collect();
        assert_eq!(messages, vec!["save failed", "disk full"]);
    }

    #[test]
    fn trace_is_bounded() {
        let frames = (0..25).map(|i| TraceFrame {
            file: "lib.rs".to_string(),
            line: i,
            ..TraceFrame::default()
        });
        let err = StructuredError::new("E", "m", ErrorCode::Int(1), "f", 1).with_trace(frames);
        assert_eq!(err.trace().len(), MAX_TRACE_FRAMES);
    }

    #[test]
    fn payload_shape_matches_wire_format() {
        let err = StructuredError::new("RuntimeException", "boom", ErrorCode::Text("E42".into()), "a.php", 7)
            .with_previous(StructuredError::new("Exception", "root", ErrorCode::Int(3), "b.php", 9));
        let payload = serde_json::to_value(&err).unwrap();
        assert_eq!(payload["code"], json!("E42"));
        assert_eq!(payload["previous"]["code"], json!(3));
        assert_eq!(payload["previous"]["previous"], json!(null));
        assert_eq!(structured_error_from_json(&payload).unwrap(), err);
    }

    #[test]
    fn display_includes_previous() {
        let err = StructuredError::new("A", "outer", ErrorCode::Int(0), "x.rs", 1)
            .with_previous(StructuredError::new("B", "inner", ErrorCode::Int(0), "y.rs", 2));
        assert_eq!(
            err.to_string(),
            "A: outer in x.rs:1\nPrevious: B: inner in y.rs:2"
        );
    }
}
