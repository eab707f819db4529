//! Unified error type for the galleria core.
//!
//! Engine operations funnel their failures into [`Error`]. Adapter-level
//! failures keep their [`ProviderError`](crate::provider::ProviderError)
//! classification so callers (and the retry layer) can tell transient
//! failures from permanent ones.

use crate::model::{ProviderCapability, ProviderName};
use crate::provider::ProviderError;

/// Unified error type covering all failure modes in the core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested provider is not registered.
    #[error("provider not found: {name}")]
    ProviderNotFound {
        /// The name as the caller supplied it.
        name: String,
    },

    /// The provider does not declare the capability the operation needs.
    ///
    /// Raised before any cache or adapter access.
    #[error("provider '{provider}' does not support {capability}")]
    CapabilityNotSupported {
        /// The provider that was asked.
        provider: ProviderName,
        /// The capability the operation requires.
        capability: ProviderCapability,
    },

    /// An adapter operation failed after the retry policy was exhausted.
    #[error("provider '{provider}' failed: {source}")]
    Provider {
        /// The provider whose adapter failed.
        provider: ProviderName,
        /// The underlying adapter error, with its retry classification.
        #[source]
        source: ProviderError,
    },

    /// A domain value object rejected its input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Convenience constructor for [`Error::ProviderNotFound`].
    pub fn provider_not_found(name: impl Into<String>) -> Self {
        Error::ProviderNotFound { name: name.into() }
    }

    /// Convenience constructor for [`Error::CapabilityNotSupported`].
    pub fn capability_not_supported(
        provider: ProviderName,
        capability: ProviderCapability,
    ) -> Self {
        Error::CapabilityNotSupported {
            provider,
            capability,
        }
    }

    /// Convenience constructor for [`Error::Provider`].
    pub fn provider(provider: ProviderName, source: ProviderError) -> Self {
        Error::Provider { provider, source }
    }

    /// Convenience constructor for [`Error::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Convenience constructor for [`Error::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Whether retrying the failed operation could succeed.
    ///
    /// Only adapter failures carry a retry classification; every other
    /// variant is a caller error and retrying is pointless.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Provider { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
