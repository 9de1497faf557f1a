//! Composite loader that dispatches to the first matching sub-loader

use super::{EnvLoader, FileLoader};
use crate::core::{ConfigError, ConfigLoader, ConfigResult, ConfigSource, SourceMetadata};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Dispatches each source to whichever registered loader claims to
/// support it, trying in registration order.
pub struct CompositeLoader {
    loaders: Vec<Arc<dyn ConfigLoader>>,
}

impl CompositeLoader {
    /// Create a composite loader with no sub-loaders registered.
    pub fn new() -> Self {
        Self {
            loaders: Vec::new(),
        }
    }

    /// Register an additional loader.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_loader(mut self, loader: Arc<dyn ConfigLoader>) -> Self {
        self.loaders.push(loader);
        self
    }

    fn find_loader(&self, source: &ConfigSource) -> ConfigResult<&Arc<dyn ConfigLoader>> {
        self.loaders
            .iter()
            .find(|loader| loader.supports(source))
            .ok_or_else(|| {
                ConfigError::source_error("no loader registered for source", source.name())
            })
    }
}

impl Default for CompositeLoader {
    /// Default composite loader with environment and file loaders registered.
    fn default() -> Self {
        Self::new()
            .with_loader(Arc::new(EnvLoader::new()))
            .with_loader(Arc::new(FileLoader::new()))
    }
}

#[async_trait]
impl ConfigLoader for CompositeLoader {
    async fn load(&self, source: &ConfigSource) -> ConfigResult<Value> {
        if matches!(source, ConfigSource::Default) {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        self.find_loader(source)?.load(source).await
    }

    fn supports(&self, source: &ConfigSource) -> bool {
        matches!(source, ConfigSource::Default) || self.loaders.iter().any(|l| l.supports(source))
    }

    async fn metadata(&self, source: &ConfigSource) -> ConfigResult<SourceMetadata> {
        if matches!(source, ConfigSource::Default) {
            return Ok(SourceMetadata::new(source.clone()));
        }
        self.find_loader(source)?.metadata(source).await
    }
}
