//! Security limits and configuration

use crate::error::SjsonError;
use serde::Deserialize;
use std::collections::BTreeSet;

/// Type names that are never restored from a class marker, whatever the configuration.
///
/// Covers reflection, filesystem iteration, process spawning and database handles,
/// under both the PHP names other SuperJSON writers emit and the Rust std names.
pub const DENIED_CLASSES: &[&str] = &[
    "ReflectionClass",
    "ReflectionMethod",
    "ReflectionFunction",
    "SplFileObject",
    "DirectoryIterator",
    "FilesystemIterator",
    "PDO",
    "mysqli",
    "SQLite3",
    "std::fs::File",
    "std::fs::ReadDir",
    "std::process::Command",
    "std::process::Child",
    "std::any::TypeId",
];

/// Whether `name` is on the fixed deny-list (ASCII case-insensitive)
pub fn is_denied_class(name: &str) -> bool {
    DENIED_CLASSES
        .iter()
        .any(|denied| denied.eq_ignore_ascii_case(name))
}

/// Security policy consulted at every recursive step of encode and decode
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityPolicy {
    /// Maximum nesting depth, counted per visited node (default: 10, hard: 512)
    pub max_depth: usize,
    /// Maximum elements per collection (default: 1,000, hard: 1,000,000)
    #[serde(alias = "max_array_size")]
    pub max_collection_size: usize,
    /// Allow restoring `class:` markers (default: false)
    pub allow_class_restoration: bool,
    /// If non-empty, only these class names may be restored
    pub allowed_classes: BTreeSet<String>,
    /// Run pre-flight validation on decode input (default: true)
    pub validate_input: bool,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_collection_size: 1_000,
            allow_class_restoration: false,
            allowed_classes: BTreeSet::new(),
            validate_input: true,
        }
    }
}

impl SecurityPolicy {
    /// Hard maximums that configuration cannot exceed
    pub fn hard_maximums() -> Self {
        Self {
            max_depth: 512,
            max_collection_size: 1_000_000,
            ..Self::default()
        }
    }

    /// Validate limits against hard maximums
    pub fn validate(&self) -> Result<(), SjsonError> {
        let hard = Self::hard_maximums();

        if self.max_depth == 0 {
            return Err(SjsonError::SecurityViolation(
                "security.max_depth must be a positive integer".to_string(),
            ));
        }
        if self.max_depth > hard.max_depth {
            return Err(SjsonError::SecurityViolation(format!(
                "security.max_depth {} exceeds hard limit {}",
                self.max_depth, hard.max_depth
            )));
        }

        if self.max_collection_size == 0 {
            return Err(SjsonError::SecurityViolation(
                "security.max_collection_size must be a positive integer".to_string(),
            ));
        }
        if self.max_collection_size > hard.max_collection_size {
            return Err(SjsonError::SecurityViolation(format!(
                "security.max_collection_size {} exceeds hard limit {}",
                self.max_collection_size, hard.max_collection_size
            )));
        }

        if let Some(name) = self.allowed_classes.iter().find(|n| n.trim().is_empty()) {
            return Err(SjsonError::SecurityViolation(format!(
                "security.allowed_classes contains an empty name: '{}'",
                name
            )));
        }

        Ok(())
    }

    /// Check a class name against the allow-list and deny-list.
    ///
    /// Returns the refusal detail, or `None` when the name may be restored.
    /// Does not consult `allow_class_restoration`.
    pub fn class_refusal(&self, name: &str) -> Option<String> {
        if !self.allowed_classes.is_empty() && !self.allowed_classes.contains(name) {
            return Some("not in the allowed classes list".to_string());
        }
        if is_denied_class(name) {
            return Some("type is blocked for security reasons".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_locked_down() {
        let policy = SecurityPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.max_depth, 10);
        assert_eq!(policy.max_collection_size, 1_000);
        assert!(!policy.allow_class_restoration);
        assert!(policy.validate_input);
    }

    #[test]
    fn zero_and_oversized_limits_are_rejected() {
        let zero_depth = SecurityPolicy {
            max_depth: 0,
            ..SecurityPolicy::default()
        };
        assert!(matches!(
            zero_depth.validate(),
            Err(SjsonError::SecurityViolation(msg)) if msg.contains("max_depth")
        ));

        let huge = SecurityPolicy {
            max_collection_size: 2_000_000,
            ..SecurityPolicy::default()
        };
        assert!(huge.validate().is_err());
    }

    #[test]
    fn deny_list_wins_over_allow_list() {
        let policy = SecurityPolicy {
            allow_class_restoration: true,
            allowed_classes: ["PDO".to_string(), "Foo".to_string()].into_iter().collect(),
            ..SecurityPolicy::default()
        };
        assert!(policy.class_refusal("Foo").is_none());
        assert!(policy.class_refusal("PDO").is_some());
        assert!(policy.class_refusal("Bar").is_some());
    }

    #[test]
    fn deny_list_ignores_case() {
        assert!(is_denied_class("reflectionclass"));
        assert!(is_denied_class("MYSQLI"));
        assert!(!is_denied_class("Invoice"));
    }
}
