//! Two-tier TTL cache between the engines and provider adapters.
//!
//! Two logical caches with independent lifetimes:
//!
//! - the **media cache** holds fetched [`Page`]s keyed by
//!   `(provider, operation, params, cursor)`, with a short TTL — freshness
//!   matters more than hit rate;
//! - the **metadata cache** holds [`ExternalProviderInfo`] keyed by provider
//!   name, with a long TTL — capability sets change rarely.
//!
//! The engines call the cache explicitly (lookup, write-back, invalidate);
//! there is no interception layer.

mod memory;
mod store;

pub use memory::MemoryCache;
pub use store::CacheStore;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;
use crate::model::{ExternalMedia, ExternalProviderInfo, Page, ProviderName};

/// Which fetch operation produced a cached page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    Latest,
    ByUser,
    ByTags,
}

impl FetchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchKind::Latest => "latest",
            FetchKind::ByUser => "by_user",
            FetchKind::ByTags => "by_tags",
        }
    }
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite key for cached media pages.
///
/// `params` is the operation's normalized query-parameter string;
/// `cursor` is the provider-issued continuation token, stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaCacheKey {
    pub provider: ProviderName,
    pub operation: FetchKind,
    pub params: String,
    pub cursor: Option<String>,
}

/// Store holding cached media pages.
pub type MediaStore = dyn CacheStore<MediaCacheKey, Page<ExternalMedia>>;

/// Store holding cached provider descriptors.
pub type MetadataStore = dyn CacheStore<ProviderName, ExternalProviderInfo>;

/// The media-query cache and the provider-metadata cache, with their TTLs.
pub struct CacheLayer {
    media: Arc<MediaStore>,
    metadata: Arc<MetadataStore>,
    media_ttl: Duration,
    metadata_ttl: Duration,
}

impl CacheLayer {
    /// Cache layer over in-process stores.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_stores(
            config,
            Arc::new(MemoryCache::new()),
            Arc::new(MemoryCache::new()),
        )
    }

    /// Cache layer over caller-supplied stores.
    pub fn with_stores(
        config: &CacheConfig,
        media: Arc<MediaStore>,
        metadata: Arc<MetadataStore>,
    ) -> Self {
        Self {
            media,
            metadata,
            media_ttl: config.media_ttl(),
            metadata_ttl: config.metadata_ttl(),
        }
    }

    pub fn get_page(&self, key: &MediaCacheKey) -> Option<Page<ExternalMedia>> {
        self.media.get(key)
    }

    pub fn put_page(&self, key: MediaCacheKey, page: Page<ExternalMedia>) {
        self.media.put(key, page, self.media_ttl);
    }

    pub fn invalidate_page(&self, key: &MediaCacheKey) {
        self.media.invalidate(key);
    }

    pub fn get_info(&self, name: &ProviderName) -> Option<ExternalProviderInfo> {
        self.metadata.get(name)
    }

    pub fn put_info(&self, info: ExternalProviderInfo) {
        self.metadata.put(info.name().clone(), info, self.metadata_ttl);
    }

    /// Drop every cached media page for `name`. Called after a successful
    /// upload, since the provider's catalog may have changed. The metadata
    /// cache is left alone: capability sets do not change on upload.
    pub fn invalidate_provider(&self, name: &ProviderName) {
        self.media
            .invalidate_matching(&|key: &MediaCacheKey| &key.provider == name);
    }

    /// Entries in the media cache, expired ones included.
    pub fn media_len(&self) -> usize {
        self.media.len()
    }
}
