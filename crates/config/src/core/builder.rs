//! Fluent builder for assembling a [`Config`]

use super::{Config, ConfigLoader, ConfigResult, ConfigSource, ConfigValidator, ConfigWatcher};
use std::sync::Arc;

/// Builds a [`Config`] from one or more sources, an optional loader,
/// validator and watcher.
///
/// Sources are merged in priority order (see [`ConfigSource::priority`])
/// once [`ConfigBuilder::build`] is called.
pub struct ConfigBuilder {
    sources: Vec<ConfigSource>,
    inline_value: Option<serde_json::Value>,
    loader: Option<Arc<dyn ConfigLoader>>,
    validator: Option<Arc<dyn ConfigValidator>>,
    watcher: Option<Arc<dyn ConfigWatcher>>,
    hot_reload: bool,
}

impl ConfigBuilder {
    /// Start an empty builder
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            inline_value: None,
            loader: None,
            validator: None,
            watcher: None,
            hot_reload: false,
        }
    }

    /// Add a source to load from. Sources are merged by priority, not by
    /// the order they were added in.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Seed the configuration with an in-memory JSON value. Useful for
    /// tests and for defaults that should be overridden by later sources.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_value(mut self, value: serde_json::Value) -> Self {
        self.inline_value = Some(value);
        self.sources.push(ConfigSource::Default);
        self
    }

    /// Load configuration files from the given path, auto-detecting format.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_file(self, path: impl Into<std::path::PathBuf>) -> Self {
        self.with_source(ConfigSource::FileAuto(path.into()))
    }

    /// Load configuration from environment variables with the given prefix.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_env_prefix(self, prefix: impl Into<String>) -> Self {
        self.with_source(ConfigSource::EnvWithPrefix(prefix.into()))
    }

    /// Override the default [`crate::loaders::CompositeLoader`].
    #[must_use = "builder methods must be chained or built"]
    pub fn with_loader(mut self, loader: Arc<dyn ConfigLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Validate merged configuration before it is accepted.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_validator(mut self, validator: Arc<dyn ConfigValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Watch sources for changes and reload automatically.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_watcher(mut self, watcher: Arc<dyn ConfigWatcher>) -> Self {
        self.watcher = Some(watcher);
        self.hot_reload = true;
        self
    }

    /// Enable or disable hot reload (requires a watcher to take effect).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_hot_reload(mut self, enabled: bool) -> Self {
        self.hot_reload = enabled;
        self
    }

    /// Load and merge all configured sources, validate, and produce a
    /// [`Config`].
    pub async fn build(self) -> ConfigResult<Config> {
        let loader: Arc<dyn ConfigLoader> = self
            .loader
            .unwrap_or_else(|| Arc::new(crate::loaders::CompositeLoader::default()));

        let mut sources = self.sources;
        sources.sort_by_key(ConfigSource::priority);
        sources.reverse(); // lowest-priority-number loads last, wins the merge

        let config = Config::new(
            self.inline_value.unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            sources,
            loader,
            self.validator,
            self.watcher,
            self.hot_reload,
        );

        config.reload().await?;
        Ok(config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Start building a [`Config`]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}
