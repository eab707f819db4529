//! Contract implemented by every external gallery provider adapter.
//!
//! Adapters wrap a specific third-party API (DeviantArt, Flickr, ...) behind
//! [`ExternalProvider`]. The core consumes adapters only through this trait
//! and the capability set declared in [`info`](ExternalProvider::info) —
//! it never inspects adapter internals.

use async_trait::async_trait;

use crate::model::{ExternalMedia, ExternalProviderInfo, Page};

/// Failure taxonomy for adapter operations.
///
/// The transient/permanent split drives the retry policy upstream:
/// transient failures are retried with bounded backoff, permanent ones are
/// surfaced immediately.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// Transient failure: timeout, connection refused, 5xx.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Permanent failure: bad credentials, malformed query, 4xx.
    #[error("provider rejected request: {0}")]
    Rejected(String),

    /// Upload-specific failure, classified with the same rule.
    #[error("upload failed: {message}")]
    Upload {
        /// Whether retrying the upload could succeed.
        transient: bool,
        message: String,
    },
}

impl ProviderError {
    /// Convenience constructor for [`ProviderError::Unavailable`].
    pub fn unavailable(msg: impl Into<String>) -> Self {
        ProviderError::Unavailable(msg.into())
    }

    /// Convenience constructor for [`ProviderError::Rejected`].
    pub fn rejected(msg: impl Into<String>) -> Self {
        ProviderError::Rejected(msg.into())
    }

    /// Convenience constructor for [`ProviderError::Upload`].
    pub fn upload(transient: bool, msg: impl Into<String>) -> Self {
        ProviderError::Upload {
            transient,
            message: msg.into(),
        }
    }

    /// Whether retrying could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Unavailable(_) => true,
            ProviderError::Rejected(_) => false,
            ProviderError::Upload { transient, .. } => *transient,
        }
    }
}

/// Result alias for adapter operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Async trait every provider adapter must implement.
///
/// Adapters are registered as `Arc<dyn ExternalProvider>` so they can be
/// shared across concurrent fan-out tasks.
///
/// The capability set returned by [`info`](Self::info) must exactly match
/// the operations the adapter actually implements. The engines trust the
/// declaration: they gate every dispatch on it and never call an undeclared
/// operation, so adapters only need to override the methods they declare —
/// the default bodies reject with a permanent error.
#[async_trait]
pub trait ExternalProvider: Send + Sync {
    /// Static descriptor for this adapter. Pure and side-effect free.
    fn info(&self) -> &ExternalProviderInfo;

    /// Fetch the provider's most recent media.
    ///
    /// `cursor` is the opaque continuation token from a previous page, passed
    /// back verbatim.
    async fn fetch_latest(
        &self,
        limit: usize,
        cursor: Option<&str>,
    ) -> ProviderResult<Page<ExternalMedia>> {
        let _ = (limit, cursor);
        Err(ProviderError::rejected(format!(
            "provider '{}' does not implement fetch_latest",
            self.info().name()
        )))
    }

    /// Fetch media posted by `username`.
    async fn fetch_by_user(
        &self,
        username: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> ProviderResult<Page<ExternalMedia>> {
        let _ = (username, limit, cursor);
        Err(ProviderError::rejected(format!(
            "provider '{}' does not implement fetch_by_user",
            self.info().name()
        )))
    }

    /// Fetch media matching `tags`.
    async fn fetch_by_tags(
        &self,
        tags: &[String],
        limit: usize,
        cursor: Option<&str>,
    ) -> ProviderResult<Page<ExternalMedia>> {
        let _ = (tags, limit, cursor);
        Err(ProviderError::rejected(format!(
            "provider '{}' does not implement fetch_by_tags",
            self.info().name()
        )))
    }

    /// Upload a media item to the provider.
    ///
    /// Retried on transient classification; the adapter is responsible for
    /// making retried uploads idempotent.
    async fn upload(&self, media: &ExternalMedia) -> ProviderResult<()> {
        let _ = media;
        Err(ProviderError::rejected(format!(
            "provider '{}' does not implement upload",
            self.info().name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(ProviderError::unavailable("timeout").is_transient());
        assert!(!ProviderError::rejected("401").is_transient());
        assert!(ProviderError::upload(true, "503").is_transient());
        assert!(!ProviderError::upload(false, "quota exceeded").is_transient());
    }

    #[test]
    fn display() {
        assert_eq!(
            ProviderError::unavailable("timeout").to_string(),
            "provider unavailable: timeout"
        );
        assert_eq!(
            ProviderError::rejected("bad token").to_string(),
            "provider rejected request: bad token"
        );
        assert_eq!(
            ProviderError::upload(false, "too large").to_string(),
            "upload failed: too large"
        );
    }
}
