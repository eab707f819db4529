//! Media fetch engine.
//!
//! Orchestrates every read path: resolves the adapter through the registry,
//! gates on the declared capability, consults the media cache, and only then
//! lets the adapter touch the network — with bounded backoff on transient
//! failures. [`MediaFetcher::fetch_from_all`] fans the same flow out across
//! every provider declaring a capability, concurrently, and degrades to
//! per-provider outcomes instead of failing wholesale.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{CacheLayer, FetchKind, MediaCacheKey};
use crate::config::{Config, RetryConfig};
use crate::error::{Error, Result};
use crate::model::{
    ExternalMedia, ExternalProviderInfo, Page, ProviderCapability, ProviderName,
};
use crate::provider::{ExternalProvider, ProviderResult};
use crate::registry::ProviderRegistry;
use crate::retry::with_retry;

/// Pagination parameters for a fetch call.
///
/// `cursor` is the opaque token a previous [`Page`] carried; it is passed
/// back to the same provider verbatim.
#[derive(Debug, Clone, Default)]
pub struct FetchRequest {
    pub limit: Option<usize>,
    pub cursor: Option<String>,
}

impl FetchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

/// One capability-bearing query, dispatched against a single provider or
/// fanned out across all providers declaring the capability.
#[derive(Debug, Clone)]
pub enum FetchOperation {
    /// The provider's most recent media.
    Latest,
    /// Media posted by a user.
    ByUser(String),
    /// Media matching a set of tags.
    ByTags(Vec<String>),
}

impl FetchOperation {
    /// The capability this operation requires.
    pub fn capability(&self) -> ProviderCapability {
        match self {
            FetchOperation::Latest => ProviderCapability::FetchLatest,
            FetchOperation::ByUser(_) => ProviderCapability::FetchByUser,
            FetchOperation::ByTags(_) => ProviderCapability::FetchByTags,
        }
    }

    fn kind(&self) -> FetchKind {
        match self {
            FetchOperation::Latest => FetchKind::Latest,
            FetchOperation::ByUser(_) => FetchKind::ByUser,
            FetchOperation::ByTags(_) => FetchKind::ByTags,
        }
    }

    /// Normalized query-parameter string for the cache key. Usernames are
    /// case-folded; tags are case-folded, sorted, and deduplicated so that
    /// queries differing only in tag order share an entry.
    fn params(&self, limit: usize) -> String {
        match self {
            FetchOperation::Latest => format!("limit={limit}"),
            FetchOperation::ByUser(username) => {
                format!("limit={limit}&user={}", username.trim().to_lowercase())
            }
            FetchOperation::ByTags(tags) => {
                let mut tags: Vec<String> =
                    tags.iter().map(|t| t.trim().to_lowercase()).collect();
                tags.sort();
                tags.dedup();
                format!("limit={limit}&tags={}", tags.join(","))
            }
        }
    }

    async fn invoke(
        &self,
        adapter: &dyn ExternalProvider,
        limit: usize,
        cursor: Option<&str>,
    ) -> ProviderResult<Page<ExternalMedia>> {
        match self {
            FetchOperation::Latest => adapter.fetch_latest(limit, cursor).await,
            FetchOperation::ByUser(username) => {
                adapter.fetch_by_user(username, limit, cursor).await
            }
            FetchOperation::ByTags(tags) => adapter.fetch_by_tags(tags, limit, cursor).await,
        }
    }
}

/// Final status of one provider inside a fan-out.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The provider contributed items to the merge. `next_cursor` continues
    /// pagination on this provider alone — cursors are never combined
    /// across providers.
    Fetched {
        items: usize,
        next_cursor: Option<String>,
    },
    /// The provider failed after its retry budget.
    Failed(Error),
    /// The caller abandoned the fan-out before this provider finished.
    Cancelled,
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Fetched { .. })
    }
}

/// Aggregated result of a multi-provider fetch.
///
/// Every resolved provider appears in `outcomes` — a failed provider is
/// excluded from `media` but never silently dropped.
#[derive(Debug, Default)]
pub struct MultiFetchResult {
    /// Successful providers' first-page items, concatenated in registry
    /// listing order (not completion order).
    pub media: Vec<ExternalMedia>,
    pub outcomes: BTreeMap<ProviderName, FetchOutcome>,
}

impl MultiFetchResult {
    /// Providers that did not contribute, with their outcome.
    pub fn failures(&self) -> impl Iterator<Item = (&ProviderName, &FetchOutcome)> {
        self.outcomes.iter().filter(|(_, o)| !o.is_success())
    }

    /// Whether every resolved provider contributed.
    pub fn is_complete(&self) -> bool {
        self.outcomes.values().all(FetchOutcome::is_success)
    }
}

/// Engine for all read operations against providers.
pub struct MediaFetcher {
    registry: Arc<ProviderRegistry>,
    cache: Arc<CacheLayer>,
    retry: RetryConfig,
    default_limit: usize,
}

impl MediaFetcher {
    pub fn new(registry: Arc<ProviderRegistry>, cache: Arc<CacheLayer>, config: &Config) -> Self {
        Self {
            registry,
            cache,
            retry: config.retry,
            default_limit: config.fetch.default_limit,
        }
    }

    /// Latest media from a single provider.
    pub async fn fetch_latest(
        &self,
        provider: &str,
        request: &FetchRequest,
    ) -> Result<Page<ExternalMedia>> {
        self.fetch_one(provider, &FetchOperation::Latest, request)
            .await
    }

    /// Media posted by `username` on a single provider.
    pub async fn fetch_by_user(
        &self,
        provider: &str,
        username: &str,
        request: &FetchRequest,
    ) -> Result<Page<ExternalMedia>> {
        self.fetch_one(
            provider,
            &FetchOperation::ByUser(username.to_string()),
            request,
        )
        .await
    }

    /// Media matching `tags` on a single provider.
    pub async fn fetch_by_tags(
        &self,
        provider: &str,
        tags: &[String],
        request: &FetchRequest,
    ) -> Result<Page<ExternalMedia>> {
        self.fetch_one(
            provider,
            &FetchOperation::ByTags(tags.to_vec()),
            request,
        )
        .await
    }

    /// A provider's descriptor, served from the metadata cache.
    pub fn provider_info(&self, provider: &str) -> Result<ExternalProviderInfo> {
        let name =
            ProviderName::new(provider).map_err(|_| Error::provider_not_found(provider))?;
        if let Some(info) = self.cache.get_info(&name) {
            debug!(provider = %name, "metadata cache hit");
            return Ok(info);
        }
        let info = self.registry.get(&name)?.info().clone();
        self.cache.put_info(info.clone());
        Ok(info)
    }

    /// Run `operation` against every provider declaring its capability,
    /// concurrently.
    ///
    /// One provider's failure (after retries) or slowness never blocks the
    /// others; its status lands in [`MultiFetchResult::outcomes`]. Each
    /// provider call has its own cache key and retry budget. `cancel` lets
    /// the caller abandon remaining in-flight calls — best-effort: already
    /// completed providers still report their result.
    pub async fn fetch_from_all(
        &self,
        operation: &FetchOperation,
        request: &FetchRequest,
        cancel: &CancellationToken,
    ) -> MultiFetchResult {
        let adapters = self.registry.by_capability(operation.capability());
        info!(
            capability = %operation.capability(),
            providers = adapters.len(),
            "fanning out fetch"
        );

        let calls = adapters.iter().map(|adapter| {
            let name = adapter.info().name().clone();
            async move {
                if cancel.is_cancelled() {
                    return (name, None);
                }
                tokio::select! {
                    _ = cancel.cancelled() => (name, None),
                    result = self.fetch_via(adapter.as_ref(), operation, request) => {
                        (name, Some(result))
                    }
                }
            }
        });

        let mut out = MultiFetchResult::default();
        for (name, result) in join_all(calls).await {
            match result {
                Some(Ok(page)) => {
                    out.outcomes.insert(
                        name,
                        FetchOutcome::Fetched {
                            items: page.len(),
                            next_cursor: page.next_cursor().map(str::to_string),
                        },
                    );
                    out.media.extend(page.into_items());
                }
                Some(Err(err)) => {
                    warn!(provider = %name, error = %err, "provider failed during fan-out");
                    out.outcomes.insert(name, FetchOutcome::Failed(err));
                }
                None => {
                    out.outcomes.insert(name, FetchOutcome::Cancelled);
                }
            }
        }
        out
    }

    async fn fetch_one(
        &self,
        provider: &str,
        operation: &FetchOperation,
        request: &FetchRequest,
    ) -> Result<Page<ExternalMedia>> {
        let adapter = self.registry.resolve(provider)?;
        self.fetch_via(adapter.as_ref(), operation, request).await
    }

    /// Capability gate, cache lookup, adapter call with retry, write-back.
    /// The gate runs before any cache or network access.
    async fn fetch_via(
        &self,
        adapter: &dyn ExternalProvider,
        operation: &FetchOperation,
        request: &FetchRequest,
    ) -> Result<Page<ExternalMedia>> {
        let info = adapter.info();
        let name = info.name().clone();
        let capability = operation.capability();
        if !info.has_capability(capability) {
            return Err(Error::capability_not_supported(name, capability));
        }

        let limit = request.limit.unwrap_or(self.default_limit);
        let key = MediaCacheKey {
            provider: name.clone(),
            operation: operation.kind(),
            params: operation.params(limit),
            cursor: request.cursor.clone(),
        };

        if let Some(page) = self.cache.get_page(&key) {
            debug!(provider = %name, operation = %key.operation, "media cache hit");
            return Ok(page);
        }
        debug!(provider = %name, operation = %key.operation, "media cache miss");

        let cursor = request.cursor.as_deref();
        let page = with_retry(self.retry, &name, key.operation.as_str(), || {
            operation.invoke(adapter, limit, cursor)
        })
        .await
        .map_err(|source| Error::provider(name.clone(), source))?;

        self.cache.put_page(key, page.clone());
        Ok(page)
    }
}
