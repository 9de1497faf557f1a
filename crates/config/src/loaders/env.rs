//! Environment variable loader

use crate::core::{ConfigError, ConfigLoader, ConfigResult, ConfigSource, SourceMetadata};
use async_trait::async_trait;
use serde_json::Value;

/// Loads configuration from process environment variables.
///
/// Keys are lowercased and `__` is treated as a path separator, so
/// `APP__SERVER__PORT=8080` becomes `{"server": {"port": "8080"}}`
/// once the prefix `APP` is stripped.
#[derive(Debug, Default, Clone)]
pub struct EnvLoader;

impl EnvLoader {
    /// Create a new environment loader
    pub fn new() -> Self {
        Self
    }

    fn load_vars(&self, prefix: Option<&str>) -> Value {
        let mut root = serde_json::Map::new();

        for (key, value) in std::env::vars() {
            let key = if let Some(prefix) = prefix {
                let prefix_with_sep = format!("{prefix}__");
                match key.strip_prefix(&prefix_with_sep) {
                    Some(stripped) => stripped.to_string(),
                    None => continue,
                }
            } else {
                key
            };

            let path: Vec<&str> = key.split("__").collect();
            insert_path(&mut root, &path, value);
        }

        Value::Object(root)
    }
}

fn insert_path(map: &mut serde_json::Map<String, Value>, path: &[&str], value: String) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    let key = head.to_lowercase();

    if rest.is_empty() {
        map.insert(key, Value::String(value));
        return;
    }

    let entry = map
        .entry(key)
        .or_insert_with(|| Value::Object(serde_json::Map::new()));
    if let Value::Object(nested) = entry {
        insert_path(nested, rest, value);
    }
}

#[async_trait]
impl ConfigLoader for EnvLoader {
    async fn load(&self, source: &ConfigSource) -> ConfigResult<Value> {
        match source {
            ConfigSource::Env => Ok(self.load_vars(None)),
            ConfigSource::EnvWithPrefix(prefix) => Ok(self.load_vars(Some(prefix))),
            other => Err(ConfigError::source_error(
                "EnvLoader only supports Env sources",
                other.name(),
            )),
        }
    }

    fn supports(&self, source: &ConfigSource) -> bool {
        source.is_env_based()
    }

    async fn metadata(&self, source: &ConfigSource) -> ConfigResult<SourceMetadata> {
        Ok(SourceMetadata::new(source.clone()))
    }
}
