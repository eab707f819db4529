//! AI-generation metadata for media items.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Whether a media item is AI-generated, plus provider-defined extras.
///
/// `attributes` is an open map carried through opaquely: providers attach
/// whatever they report (model name, generation parameters, ...) and the core
/// never interprets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiMetadata {
    pub is_ai_generated: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl AiMetadata {
    /// Metadata for an AI-generated item.
    pub fn ai_generated() -> Self {
        Self {
            is_ai_generated: true,
            attributes: BTreeMap::new(),
        }
    }

    /// Metadata for a human-made item.
    pub fn not_ai_generated() -> Self {
        Self::default()
    }

    /// Attach a provider-defined attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}
