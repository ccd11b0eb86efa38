//! Regular-expression pattern value (`/source/flags`)

use crate::error::ValueError;
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Flags accepted in the canonical `/source/flags` form
pub const PATTERN_FLAGS: &str = "dgimsuvy";

/// Regular-expression source plus flag string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    source: String,
    flags: String,
}

impl Pattern {
    /// Build from source and flags; flags must be a subset of `dgimsuvy` without repeats
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Result<Self, ValueError> {
        let flags = flags.into();
        if !is_flag_set(&flags) {
            return Err(ValueError::InvalidFlags(flags));
        }
        Ok(Self {
            source: source.into(),
            flags,
        })
    }

    /// Parse the `/source/flags` form.
    ///
    /// Text that does not start with `/`, or whose tail after the last `/` is not
    /// a flag set, is taken whole as the source with no flags.
    pub fn parse(text: &str) -> Self {
        if let Some(body) = text.strip_prefix('/') {
            if let Some(idx) = body.rfind('/') {
                let (source, flags) = (&body[..idx], &body[idx + 1..]);
                if is_flag_set(flags) {
                    return Self {
                        source: source.to_string(),
                        flags: flags.to_string(),
                    };
                }
            }
        }
        Self {
            source: text.to_string(),
            flags: String::new(),
        }
    }

    /// Pattern source
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Flag string
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Whether `flag` is set
    pub fn has_flag(&self, flag: char) -> bool {
        self.flags.contains(flag)
    }

    /// Compile with the flag set translated to `regex` crate options.
    ///
    /// `g`, `y` and `d` only affect how a match is driven, so they have no
    /// compile-time counterpart.
    pub fn to_regex(&self) -> Result<Regex, ValueError> {
        RegexBuilder::new(&self.source)
            .case_insensitive(self.has_flag('i'))
            .multi_line(self.has_flag('m'))
            .dot_matches_new_line(self.has_flag('s'))
            .unicode(true)
            .build()
            .map_err(|e| ValueError::InvalidPattern {
                source_text: self.source.clone(),
                reason: e.to_string(),
            })
    }

    /// Every non-overlapping match in `subject`
    pub fn find_all(&self, subject: &str) -> Result<Vec<String>, ValueError> {
        let regex = self.to_regex()?;
        Ok(regex
            .find_iter(subject)
            .map(|m| m.as_str().to_string())
            .collect())
    }
}

fn is_flag_set(flags: &str) -> bool {
    flags
        .char_indices()
        .all(|(i, c)| PATTERN_FLAGS.contains(c) && !flags[..i].contains(c))
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}
