//! File-based configuration loader (JSON, TOML, YAML)

use crate::core::{ConfigError, ConfigFormat, ConfigLoader, ConfigResult, ConfigSource, SourceMetadata};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

/// Loads configuration from a single file or a directory of files,
/// auto-detecting format from extension.
#[derive(Debug, Default, Clone)]
pub struct FileLoader;

impl FileLoader {
    /// Create a new file loader
    pub fn new() -> Self {
        Self
    }

    async fn load_file(&self, path: &Path) -> ConfigResult<Value> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::source_error(e.to_string(), path.display().to_string()))?;

        match ConfigFormat::from_path(path) {
            ConfigFormat::Json => Ok(serde_json::from_str(&contents)?),
            #[cfg(feature = "toml")]
            ConfigFormat::Toml => toml::from_str(&contents)
                .map_err(|e| ConfigError::source_error(e.to_string(), path.display().to_string())),
            #[cfg(feature = "yaml")]
            ConfigFormat::Yaml => serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::source_error(e.to_string(), path.display().to_string())),
            format => Err(ConfigError::source_error(
                format!("unsupported config format: {format}"),
                path.display().to_string(),
            )),
        }
    }

    async fn load_directory(&self, dir: &Path) -> ConfigResult<Value> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| ConfigError::source_error(e.to_string(), dir.display().to_string()))?;

        let mut merged = Value::Object(serde_json::Map::new());
        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ConfigError::source_error(e.to_string(), dir.display().to_string()))?
        {
            let path = entry.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let value = self.load_file(&path).await?;
            crate::core::config::merge_json(&mut merged, value)?;
        }

        Ok(merged)
    }
}

#[async_trait]
impl ConfigLoader for FileLoader {
    async fn load(&self, source: &ConfigSource) -> ConfigResult<Value> {
        match source {
            ConfigSource::File(path) | ConfigSource::FileAuto(path) => self.load_file(path).await,
            ConfigSource::Directory(path) => self.load_directory(path).await,
            other => Err(ConfigError::source_error(
                "FileLoader only supports file-based sources",
                other.name(),
            )),
        }
    }

    fn supports(&self, source: &ConfigSource) -> bool {
        source.is_file_based()
    }

    async fn metadata(&self, source: &ConfigSource) -> ConfigResult<SourceMetadata> {
        let path = match source {
            ConfigSource::File(p) | ConfigSource::FileAuto(p) | ConfigSource::Directory(p) => p,
            other => {
                return Err(ConfigError::source_error(
                    "FileLoader only supports file-based sources",
                    other.name(),
                ));
            }
        };

        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| ConfigError::source_error(e.to_string(), path.display().to_string()))?;

        let mut source_meta = SourceMetadata::new(source.clone()).with_size(meta.len());
        if let Ok(modified) = meta.modified() {
            source_meta = source_meta.with_last_modified(chrono::DateTime::from(modified));
        }
        Ok(source_meta.with_format(ConfigFormat::from_path(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn loads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"name": "app", "port": 8080}"#)
            .await
            .unwrap();

        let loader = FileLoader::new();
        let value = loader
            .load(&ConfigSource::FileAuto(path))
            .await
            .unwrap();

        assert_eq!(value["name"], Value::String("app".to_string()));
        assert_eq!(value["port"], Value::Number(8080.into()));
    }

    #[tokio::test]
    async fn missing_file_errors() {
        let loader = FileLoader::new();
        let result = loader
            .load(&ConfigSource::FileAuto(PathBuf::from("/nonexistent/path.json")))
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn supports_file_sources_only() {
        let loader = FileLoader::new();
        assert!(loader.supports(&ConfigSource::File(PathBuf::from("f"))));
        assert!(loader.supports(&ConfigSource::Directory(PathBuf::from("d"))));
        assert!(!loader.supports(&ConfigSource::Env));
    }
}
