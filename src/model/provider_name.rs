//! Normalized provider identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Normalized identifier for an external provider.
///
/// Construction trims the input, lower-cases it, and strips every character
/// outside `[a-z0-9]`, so `"Deviant-Art "` and `"deviantart"` name the same
/// provider. The normalized form always matches `^[a-z0-9]+$`; input that
/// normalizes to the empty string is rejected.
///
/// Display-friendly forms are the caller's concern and are never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderName(String);

impl ProviderName {
    /// Normalize `raw` into a provider name.
    pub fn new(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(Error::validation(
                "provider name cannot be empty or whitespace",
            ));
        }

        let normalized: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();

        if normalized.is_empty() {
            return Err(Error::validation(
                "provider name must contain at least one alphanumeric character",
            ));
        }

        Ok(Self(normalized))
    }

    /// The normalized form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProviderName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProviderName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<ProviderName> for String {
    fn from(name: ProviderName) -> Self {
        name.0
    }
}
