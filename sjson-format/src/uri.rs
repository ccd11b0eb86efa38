//! Absolute URL value with eagerly decomposed components

use crate::error::ValueError;
use std::fmt;
use url::Url;

/// Validated absolute URL
///
/// Components are computed once at construction. The original text is kept for
/// round-tripping, so `as_str` may differ from the `url` crate's normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbsoluteUrl {
    text: String,
    scheme: String,
    host: Option<String>,
    port: Option<u16>,
    path: Option<String>,
    query: Option<String>,
    fragment: Option<String>,
    user: Option<String>,
    password: Option<String>,
}

impl AbsoluteUrl {
    /// Parse and validate an absolute URL
    pub fn parse(text: impl Into<String>) -> Result<Self, ValueError> {
        let text = text.into();
        let parsed = Url::parse(&text).map_err(|e| ValueError::InvalidUrl {
            url: text.clone(),
            reason: e.to_string(),
        })?;

        let path = match parsed.path() {
            "" => None,
            p => Some(p.to_string()),
        };
        let user = match parsed.username() {
            "" => None,
            u => Some(u.to_string()),
        };

        Ok(Self {
            scheme: parsed.scheme().to_string(),
            host: parsed.host_str().map(str::to_string),
            port: parsed.port(),
            path,
            query: parsed.query().map(str::to_string),
            fragment: parsed.fragment().map(str::to_string),
            user,
            password: parsed.password().map(str::to_string),
            text,
        })
    }

    /// Original URL text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Scheme, lower-cased
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host, if any
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Explicit port; scheme defaults are not reported
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Path, if non-empty
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Query string without the leading `?`
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Fragment without the leading `#`
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// User name, if non-empty
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Password, if any
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl fmt::Display for AbsoluteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
