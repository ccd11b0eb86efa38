//! Closed registry of restorable record types
//!
//! Class markers in untrusted input never name arbitrary types: a name can
//! only be restored if the embedding application registered a zero-argument
//! factory for it. The factory's record declares the fields a payload may set.

use sjson_format::limits::is_denied_class;
use sjson_format::{Record, SjsonError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Zero-argument record factory
pub type RecordFactory = Arc<dyn Fn() -> Record + Send + Sync>;

/// Name-to-factory map consulted by class-marker restoration
#[derive(Clone, Default)]
pub struct ClassRegistry {
    factories: HashMap<String, RecordFactory>,
}

impl ClassRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`.
    ///
    /// # Errors
    ///
    /// Returns `SecurityViolation` if the name is empty or on the deny-list.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), SjsonError>
    where
        F: Fn() -> Record + Send + Sync + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SjsonError::SecurityViolation(
                "class factory name must not be empty".to_string(),
            ));
        }
        if is_denied_class(&name) {
            return Err(SjsonError::SecurityViolation(format!(
                "class '{}' is blocked for security reasons and cannot be registered",
                name
            )));
        }
        self.factories.insert(name, Arc::new(factory));
        Ok(())
    }

    /// Build a fresh record for `name`
    pub fn instantiate(&self, name: &str) -> Option<Record> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Whether a factory is registered for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered factories
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no factory is registered
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sjson_format::Value;

    #[test]
    fn factories_build_fresh_records() {
        let mut registry = ClassRegistry::new();
        registry
            .register("App\\User", || {
                Record::new("App\\User")
                    .with_field("name", Value::Null)
                    .with_field("email", Value::Null)
            })
            .unwrap();

        let first = registry.instantiate("App\\User").unwrap();
        let second = registry.instantiate("App\\User").unwrap();
        assert_eq!(first, second);
        assert!(first.has_field("email"));
        assert!(registry.instantiate("App\\Admin").is_none());
        assert_eq!(registry.names(), vec!["App\\User"]);
    }

    #[test]
    fn denied_names_cannot_be_registered() {
        let mut registry = ClassRegistry::new();
        let err = registry
            .register("pdo", || Record::new("PDO"))
            .unwrap_err();
        assert!(matches!(err, SjsonError::SecurityViolation(_)));
        assert!(registry.register("  ", || Record::new("x")).is_err());
        assert!(registry.is_empty());
    }
}
