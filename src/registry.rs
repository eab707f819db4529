//! Registry of provider adapters.
//!
//! The registry is assembled once at startup by an external bootstrap step
//! (discovery itself is out of scope) through [`ProviderRegistryBuilder`],
//! and is immutable afterwards: lookups take no lock and one provider's
//! traffic never serializes another's.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::error::{Error, Result};
use crate::model::{ExternalProviderInfo, ProviderCapability, ProviderName};
use crate::provider::ExternalProvider;

/// Immutable, name-indexed set of registered provider adapters.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn ExternalProvider>>,
    by_name: HashMap<ProviderName, usize>,
}

/// Collects adapters before the registry is frozen.
#[derive(Default)]
pub struct ProviderRegistryBuilder {
    providers: Vec<Arc<dyn ExternalProvider>>,
}

impl ProviderRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an adapter. Registration order is preserved and becomes the
    /// listing order.
    pub fn register(mut self, provider: Arc<dyn ExternalProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Freeze the registry. When two adapters normalize to the same name the
    /// later registration replaces the earlier one.
    pub fn build(self) -> ProviderRegistry {
        let mut providers: Vec<Arc<dyn ExternalProvider>> = Vec::new();
        let mut by_name = HashMap::new();

        for provider in self.providers {
            let name = provider.info().name().clone();
            match by_name.get(&name) {
                Some(&idx) => {
                    warn!(provider = %name, "replacing previously registered provider");
                    providers[idx] = provider;
                }
                None => {
                    by_name.insert(name, providers.len());
                    providers.push(provider);
                }
            }
        }

        ProviderRegistry { providers, by_name }
    }
}

impl ProviderRegistry {
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::new()
    }

    /// Look up an adapter by its normalized name.
    pub fn get(&self, name: &ProviderName) -> Result<Arc<dyn ExternalProvider>> {
        self.by_name
            .get(name)
            .map(|&idx| Arc::clone(&self.providers[idx]))
            .ok_or_else(|| Error::provider_not_found(name.as_str()))
    }

    /// Normalize a raw name, then look it up. A name that cannot normalize
    /// cannot be registered, so it reports as not found.
    pub fn resolve(&self, raw: &str) -> Result<Arc<dyn ExternalProvider>> {
        let name = ProviderName::new(raw).map_err(|_| Error::provider_not_found(raw))?;
        self.get(&name)
    }

    /// Descriptors of every registered provider, in registration order.
    pub fn list(&self) -> Vec<&ExternalProviderInfo> {
        self.providers.iter().map(|p| p.info()).collect()
    }

    /// Adapters declaring `capability`, in registration order.
    pub fn by_capability(&self, capability: ProviderCapability) -> Vec<Arc<dyn ExternalProvider>> {
        self.providers
            .iter()
            .filter(|p| p.info().has_capability(capability))
            .map(Arc::clone)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
