//! Provider descriptor record.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{ProviderCapability, ProviderName};

/// Immutable description of an external provider: its normalized name, a
/// human-readable description, and the set of capabilities it declares.
///
/// The declared set is the contract: the engines dispatch only operations
/// whose capability appears here and never probe the adapter to verify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalProviderInfo {
    name: ProviderName,
    description: String,
    capabilities: BTreeSet<ProviderCapability>,
}

impl ExternalProviderInfo {
    /// Build a descriptor. At least one capability must be declared.
    pub fn new(
        name: ProviderName,
        description: impl Into<String>,
        capabilities: impl IntoIterator<Item = ProviderCapability>,
    ) -> Result<Self> {
        let capabilities: BTreeSet<ProviderCapability> = capabilities.into_iter().collect();
        if capabilities.is_empty() {
            return Err(Error::validation(
                "provider must declare at least one capability",
            ));
        }
        Ok(Self {
            name,
            description: description.into(),
            capabilities,
        })
    }

    pub fn name(&self) -> &ProviderName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn capabilities(&self) -> &BTreeSet<ProviderCapability> {
        &self.capabilities
    }

    pub fn has_capability(&self, capability: ProviderCapability) -> bool {
        self.capabilities.contains(&capability)
    }
}

impl fmt::Display for ExternalProviderInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.name)?;
        for (i, cap) in self.capabilities.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{cap}")?;
        }
        f.write_str("]")
    }
}
