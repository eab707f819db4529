//! Media item value object.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    AiMetadata, ContentMetadata, ExternalProviderInfo, MatureRating, ProviderName,
};

const MAX_TITLE_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 2048;
const MAX_TAGS: usize = 30;

/// A media item as reported by an external provider.
///
/// Validated at construction; once built it is immutable. The logical
/// identity of an item is `(provider name, url)` — the core never assumes a
/// URL is unique across providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExternalMedia")]
pub struct ExternalMedia {
    url: String,
    title: String,
    description: String,
    content: ContentMetadata,
    tags: BTreeSet<String>,
    rating: MatureRating,
    ai_metadata: AiMetadata,
    provider: ExternalProviderInfo,
}

impl ExternalMedia {
    /// Build a media item, validating every field.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        content: ContentMetadata,
        tags: impl IntoIterator<Item = String>,
        rating: MatureRating,
        ai_metadata: AiMetadata,
        provider: ExternalProviderInfo,
    ) -> Result<Self> {
        let url = url.into();
        if !is_valid_url(&url) {
            return Err(Error::validation(format!("invalid media url: {url:?}")));
        }

        let title = title.into();
        if title.trim().is_empty() {
            return Err(Error::validation("media title cannot be empty"));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(Error::validation(format!(
                "media title exceeds {MAX_TITLE_LEN} characters"
            )));
        }

        let description = description.into();
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(Error::validation(format!(
                "media description exceeds {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        let tags: BTreeSet<String> = tags.into_iter().collect();
        if tags.len() > MAX_TAGS {
            return Err(Error::validation(format!(
                "media carries more than {MAX_TAGS} tags"
            )));
        }

        Ok(Self {
            url,
            title,
            description,
            content,
            tags,
            rating,
            ai_metadata,
            provider,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn content(&self) -> &ContentMetadata {
        &self.content
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn rating(&self) -> MatureRating {
        self.rating
    }

    pub fn ai_metadata(&self) -> &AiMetadata {
        &self.ai_metadata
    }

    pub fn provider(&self) -> &ExternalProviderInfo {
        &self.provider
    }

    /// The provider this item came from.
    pub fn provider_name(&self) -> &ProviderName {
        self.provider.name()
    }

    /// Whether `other` is the same logical item: same provider, same URL.
    pub fn same_item_as(&self, other: &ExternalMedia) -> bool {
        self.provider.name() == other.provider.name() && self.url == other.url
    }
}

/// A URL is acceptable when it has no whitespace, a non-empty scheme, and a
/// non-empty host part after `://`.
fn is_valid_url(url: &str) -> bool {
    if url.is_empty() || url.contains(char::is_whitespace) {
        return false;
    }
    let Some((scheme, rest)) = url.split_once("://") else {
        return false;
    };
    if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.') {
        return false;
    }
    let host = rest.split('/').next().unwrap_or("");
    !host.is_empty()
}

/// Wire shape; routed through [`ExternalMedia::new`] on deserialization so
/// the validation rules hold for decoded payloads too.
#[derive(Deserialize)]
struct RawExternalMedia {
    url: String,
    title: String,
    #[serde(default)]
    description: String,
    content: ContentMetadata,
    #[serde(default)]
    tags: BTreeSet<String>,
    rating: MatureRating,
    #[serde(default)]
    ai_metadata: AiMetadata,
    provider: ExternalProviderInfo,
}

impl TryFrom<RawExternalMedia> for ExternalMedia {
    type Error = Error;

    fn try_from(raw: RawExternalMedia) -> Result<Self> {
        Self::new(
            raw.url,
            raw.title,
            raw.description,
            raw.content,
            raw.tags,
            raw.rating,
            raw.ai_metadata,
            raw.provider,
        )
    }
}
