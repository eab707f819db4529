//! Shared test doubles for the engine integration tests.
//!
//! [`StubProvider`] is a scriptable in-memory adapter: tests choose its
//! capability set, the page it serves, how often it fails and how, and read
//! back atomic call counters to assert how many times the engines actually
//! reached it.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use galleria::cache::CacheLayer;
use galleria::config::{Config, RetryConfig};
use galleria::fetch::MediaFetcher;
use galleria::model::{
    AiMetadata, ContentMetadata, ContentType, Dimensions, ExternalMedia, ExternalProviderInfo,
    MatureRating, Page, ProviderCapability, ProviderName,
};
use galleria::provider::{ExternalProvider, ProviderError, ProviderResult};
use galleria::registry::ProviderRegistry;
use galleria::upload::MediaUploader;

pub struct StubProvider {
    info: ExternalProviderInfo,
    items: Vec<ExternalMedia>,
    next_cursor: Option<String>,
    fetch_error: Option<ProviderError>,
    upload_error: Option<ProviderError>,
    fail_first: usize,
    delay: Option<Duration>,
    fetch_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    info_calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(name: &str, capabilities: &[ProviderCapability]) -> Self {
        Self {
            info: provider_info(name, capabilities),
            items: Vec::new(),
            next_cursor: None,
            fetch_error: None,
            upload_error: None,
            fail_first: 0,
            delay: None,
            fetch_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            info_calls: AtomicUsize::new(0),
        }
    }

    /// Items every successful fetch returns.
    pub fn with_items(mut self, items: Vec<ExternalMedia>) -> Self {
        self.items = items;
        self
    }

    /// Cursor every successful fetch page carries.
    pub fn with_cursor(mut self, cursor: &str) -> Self {
        self.next_cursor = Some(cursor.to_string());
        self
    }

    /// Fail every fetch with `err`.
    pub fn failing_fetch(mut self, err: ProviderError) -> Self {
        self.fetch_error = Some(err);
        self
    }

    /// Fail every upload with `err`.
    pub fn failing_upload(mut self, err: ProviderError) -> Self {
        self.upload_error = Some(err);
        self
    }

    /// Fail the first `n` calls (fetch or upload) as transiently unavailable,
    /// then behave normally.
    pub fn fail_first(mut self, n: usize) -> Self {
        self.fail_first = n;
        self
    }

    /// Sleep before answering, to give cancellation something to race.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }

    async fn serve_fetch(&self) -> ProviderResult<Page<ExternalMedia>> {
        let call = self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if call < self.fail_first {
            return Err(ProviderError::unavailable("scripted outage"));
        }
        if let Some(err) = &self.fetch_error {
            return Err(err.clone());
        }
        Ok(Page::new(self.items.clone(), self.next_cursor.clone()))
    }
}

#[async_trait]
impl ExternalProvider for StubProvider {
    fn info(&self) -> &ExternalProviderInfo {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        &self.info
    }

    async fn fetch_latest(
        &self,
        _limit: usize,
        _cursor: Option<&str>,
    ) -> ProviderResult<Page<ExternalMedia>> {
        self.serve_fetch().await
    }

    async fn fetch_by_user(
        &self,
        _username: &str,
        _limit: usize,
        _cursor: Option<&str>,
    ) -> ProviderResult<Page<ExternalMedia>> {
        self.serve_fetch().await
    }

    async fn fetch_by_tags(
        &self,
        _tags: &[String],
        _limit: usize,
        _cursor: Option<&str>,
    ) -> ProviderResult<Page<ExternalMedia>> {
        self.serve_fetch().await
    }

    async fn upload(&self, _media: &ExternalMedia) -> ProviderResult<()> {
        let call = self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if call < self.fail_first {
            return Err(ProviderError::unavailable("scripted outage"));
        }
        if let Some(err) = &self.upload_error {
            return Err(err.clone());
        }
        Ok(())
    }
}

pub fn provider_info(name: &str, capabilities: &[ProviderCapability]) -> ExternalProviderInfo {
    ExternalProviderInfo::new(
        ProviderName::new(name).unwrap(),
        "stub provider",
        capabilities.iter().copied(),
    )
    .unwrap()
}

/// A valid media item attributed to `provider`.
pub fn media_item(provider: &str, url: &str, title: &str) -> ExternalMedia {
    ExternalMedia::new(
        url,
        title,
        "stub description",
        ContentMetadata {
            content_type: ContentType::ImageJpeg,
            dimensions: Dimensions {
                width: 800,
                height: 600,
            },
            file_size_bytes: 123_456,
        },
        vec!["art".to_string()],
        MatureRating::Pg,
        AiMetadata::not_ai_generated(),
        provider_info(provider, &ProviderCapability::ALL),
    )
    .unwrap()
}

/// Config with a millisecond backoff so retry tests stay fast.
pub fn test_config() -> Config {
    Config {
        retry: RetryConfig {
            max_attempts: 3,
            base_delay_ms: 1,
        },
        ..Config::default()
    }
}

/// Run tests with `RUST_LOG=galleria=debug` to see engine traces.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Registry + shared cache + both engines over the given providers.
pub fn engines(
    providers: Vec<Arc<StubProvider>>,
) -> (MediaFetcher, MediaUploader, Arc<CacheLayer>) {
    init_tracing();
    let config = test_config();
    let mut builder = ProviderRegistry::builder();
    for provider in providers {
        builder = builder.register(provider);
    }
    let registry = Arc::new(builder.build());
    let cache = Arc::new(CacheLayer::new(&config.cache));
    let fetcher = MediaFetcher::new(Arc::clone(&registry), Arc::clone(&cache), &config);
    let uploader = MediaUploader::new(registry, Arc::clone(&cache), &config);
    (fetcher, uploader, cache)
}
