//! Configuration loading
//!
//! Reads the transformer list and security policy from TOML:
//!
//! ```toml
//! transformers = ["Date", "bigint", "set", "map", "regexp", "URL", "Error"]
//!
//! [security]
//! max_depth = 10
//! max_collection_size = 1000
//! allow_class_restoration = false
//! allowed_classes = []
//! validate_input = true
//! ```
//!
//! Every field is optional. Any problem with the file is reported as a
//! `SecurityViolation`, so a misconfigured engine is never built.

use serde::Deserialize;
use sjson_codec::{builtin, ClassRegistry, Engine, TransformerRegistry};
use sjson_format::{SecurityPolicy, SjsonError, TypeTag};
use std::fs;
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SjsonConfig {
    /// Built-in transformer tags to register, in lookup order
    pub transformers: Vec<String>,
    /// Security limits
    pub security: SecurityPolicy,
}

impl Default for SjsonConfig {
    fn default() -> Self {
        Self {
            transformers: TypeTag::ALL.iter().map(|t| t.as_str().to_string()).collect(),
            security: SecurityPolicy::default(),
        }
    }
}

impl SjsonConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, SjsonError> {
        let config: Self = toml::from_str(text)
            .map_err(|e| SjsonError::SecurityViolation(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SjsonError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            SjsonError::SecurityViolation(format!(
                "cannot read configuration {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&text)
    }

    /// Check transformer names and policy limits
    pub fn validate(&self) -> Result<(), SjsonError> {
        self.tags()?;
        self.security.validate()
    }

    /// Configured tags, parsed
    pub fn tags(&self) -> Result<Vec<TypeTag>, SjsonError> {
        self.transformers
            .iter()
            .map(|name| {
                name.parse::<TypeTag>().map_err(|_| {
                    SjsonError::SecurityViolation(format!("unknown transformer '{}'", name))
                })
            })
            .collect()
    }

    /// Build an engine whose registry is exactly the configured list
    pub fn build_engine(&self, classes: ClassRegistry) -> Result<Engine, SjsonError> {
        let registry: TransformerRegistry = self.tags()?.into_iter().map(builtin).collect();
        Engine::builder()
            .policy(self.security.clone())
            .transformers(registry)
            .classes(classes)
            .build()
    }
}
