//! Closed enumeration of provider capabilities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An operation a provider declares support for.
///
/// The set is closed: adapters pick a subset at registration time and the
/// engines gate dispatch on the declared set. New variants may be added, but
/// removing one is a compatibility break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderCapability {
    /// Fetch the provider's most recent media.
    FetchLatest,
    /// Fetch media posted by a specific user.
    FetchByUser,
    /// Fetch media matching a set of tags.
    FetchByTags,
    /// Upload media to the provider.
    Upload,
}

impl ProviderCapability {
    /// Every capability, in declaration order.
    pub const ALL: [ProviderCapability; 4] = [
        ProviderCapability::FetchLatest,
        ProviderCapability::FetchByUser,
        ProviderCapability::FetchByTags,
        ProviderCapability::Upload,
    ];

    /// Wire name of this capability.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderCapability::FetchLatest => "fetch_latest",
            ProviderCapability::FetchByUser => "fetch_by_user",
            ProviderCapability::FetchByTags => "fetch_by_tags",
            ProviderCapability::Upload => "upload",
        }
    }
}

impl fmt::Display for ProviderCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
