//! Type tag enumeration

use crate::constants::{TAG_BIGINT, TAG_DATE, TAG_ERROR, TAG_MAP, TAG_REGEXP, TAG_SET, TAG_URL};
use std::fmt;
use std::str::FromStr;

/// Built-in transformer type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Date/time instant
    Date,
    /// Arbitrary-precision integer
    BigInt,
    /// Deduplicated item list
    Set,
    /// Ordered key/value list
    Map,
    /// Regular-expression pattern
    Regexp,
    /// Absolute URL
    Url,
    /// Structured error
    Error,
}

impl TypeTag {
    /// All built-in tags in default registration order
    pub const ALL: [TypeTag; 7] = [
        TypeTag::Date,
        TypeTag::BigInt,
        TypeTag::Set,
        TypeTag::Map,
        TypeTag::Regexp,
        TypeTag::Url,
        TypeTag::Error,
    ];

    /// Wire string for this tag
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Date => TAG_DATE,
            TypeTag::BigInt => TAG_BIGINT,
            TypeTag::Set => TAG_SET,
            TypeTag::Map => TAG_MAP,
            TypeTag::Regexp => TAG_REGEXP,
            TypeTag::Url => TAG_URL,
            TypeTag::Error => TAG_ERROR,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("Unknown type tag: {}", s))
    }
}
