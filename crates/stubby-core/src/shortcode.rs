use crate::error::CreateError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

/// Longest code the registry accepts, custom or generated.
pub const MAX_LENGTH: usize = 64;

/// A validated short code identifier for a link.
///
/// Short codes are 1-64 characters long and contain only
/// alphanumeric characters, hyphens, or underscores.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    pub fn new(code: impl Into<String>) -> Result<Self, CreateError> {
        let code = code.into();
        if !Self::validate_format(&code) {
            return Err(CreateError::InvalidCodeFormat(code));
        }
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes read back from a store or produced by a
    /// generator whose output is checked with [`ShortCode::validate_format`]
    /// before it is persisted.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns true iff `code` is non-empty, at most [`MAX_LENGTH`] long and
    /// made only of `[A-Za-z0-9_-]`.
    pub fn validate_format(code: &str) -> bool {
        !code.is_empty()
            && code.len() <= MAX_LENGTH
            && code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ShortCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ShortCode::new(s).map_err(serde::de::Error::custom)
    }
}
