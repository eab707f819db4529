//! Media upload engine.
//!
//! Write-path counterpart of [`MediaFetcher`](crate::fetch::MediaFetcher):
//! capability-gated dispatch, retry on transient classification only, and
//! provider-scoped media-cache invalidation once an upload lands (the
//! provider's catalog may have changed). The broadcast variant is a
//! best-effort fan-out, not a distributed transaction — no rollback is
//! attempted across providers.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::cache::CacheLayer;
use crate::config::{Config, RetryConfig};
use crate::error::{Error, Result};
use crate::model::{ExternalMedia, ProviderCapability};
use crate::provider::ExternalProvider;
use crate::registry::ProviderRegistry;
use crate::retry::with_retry;

/// Final status of one provider inside an upload broadcast.
#[derive(Debug)]
pub enum UploadOutcome {
    Uploaded,
    /// Resolution, capability check, or the upload itself failed. Capability
    /// failures are recorded without a single adapter call.
    Failed(Error),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Uploaded)
    }
}

/// Engine for upload operations against providers.
pub struct MediaUploader {
    registry: Arc<ProviderRegistry>,
    cache: Arc<CacheLayer>,
    retry: RetryConfig,
}

impl MediaUploader {
    pub fn new(registry: Arc<ProviderRegistry>, cache: Arc<CacheLayer>, config: &Config) -> Self {
        Self {
            registry,
            cache,
            retry: config.retry,
        }
    }

    /// Upload `media` to a single provider.
    pub async fn upload(&self, provider: &str, media: &ExternalMedia) -> Result<()> {
        let adapter = self.registry.resolve(provider)?;
        self.upload_via(adapter.as_ref(), media).await
    }

    /// Upload `media` to every named provider, concurrently.
    ///
    /// Returns one outcome per requested name, keyed by the name as the
    /// caller gave it. An unknown name or a missing `upload` capability is
    /// recorded as that provider's failure and never aborts the rest.
    pub async fn upload_to_multiple<S: AsRef<str>>(
        &self,
        media: &ExternalMedia,
        providers: &[S],
    ) -> BTreeMap<String, UploadOutcome> {
        info!(providers = providers.len(), "broadcasting upload");

        let calls = providers.iter().map(|raw| {
            let raw = raw.as_ref().to_string();
            async move {
                let outcome = match self.registry.resolve(&raw) {
                    Ok(adapter) => match self.upload_via(adapter.as_ref(), media).await {
                        Ok(()) => UploadOutcome::Uploaded,
                        Err(err) => UploadOutcome::Failed(err),
                    },
                    Err(err) => UploadOutcome::Failed(err),
                };
                (raw, outcome)
            }
        });

        let mut outcomes = BTreeMap::new();
        for (name, outcome) in join_all(calls).await {
            if let UploadOutcome::Failed(err) = &outcome {
                warn!(provider = %name, error = %err, "upload failed");
            }
            outcomes.insert(name, outcome);
        }
        outcomes
    }

    /// Capability gate, adapter call with retry on transient classification,
    /// provider-wide media-cache invalidation on success.
    async fn upload_via(&self, adapter: &dyn ExternalProvider, media: &ExternalMedia) -> Result<()> {
        let info = adapter.info();
        let name = info.name().clone();
        if !info.has_capability(ProviderCapability::Upload) {
            return Err(Error::capability_not_supported(
                name,
                ProviderCapability::Upload,
            ));
        }

        with_retry(self.retry, &name, "upload", || adapter.upload(media))
            .await
            .map_err(|source| Error::provider(name.clone(), source))?;

        info!(provider = %name, url = media.url(), "upload succeeded, invalidating media cache");
        self.cache.invalidate_provider(&name);
        Ok(())
    }
}
