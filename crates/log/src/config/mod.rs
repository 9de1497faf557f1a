//! Logger configuration: level, output format, display options, and the
//! global fields attached to every event via the builder's root span.

mod presets;

use serde::{Deserialize, Serialize};

/// Output format for log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Format {
    /// Multi-line, human-oriented output for local development.
    Pretty,
    /// Single-line, human-oriented output.
    #[default]
    Compact,
    /// logfmt-leaning output; rendered the same as `Compact` for now.
    Logfmt,
    /// One JSON object per record.
    Json,
}

/// Display toggles applied on top of the chosen [`Format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// ANSI color codes in terminal output.
    pub colors: bool,
    /// File name and line number on each record.
    pub source: bool,
    /// Timestamp on each record.
    pub time: bool,
    /// For JSON output, flatten event fields into the top-level object
    /// instead of nesting them under a `fields` key.
    pub flatten: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { colors: true, source: false, time: true, flatten: false }
    }
}

impl DisplayConfig {
    /// Applies `NEBULA_LOG_COLORS` / `NEBULA_LOG_SOURCE` overrides, if set.
    pub fn parse_env(&mut self) {
        if let Ok(v) = std::env::var("NEBULA_LOG_COLORS") {
            self.colors = parse_bool(&v, self.colors);
        }
        if let Ok(v) = std::env::var("NEBULA_LOG_SOURCE") {
            self.source = parse_bool(&v, self.source);
        }
    }
}

fn parse_bool(value: &str, default: bool) -> bool {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Global fields stamped onto every event, via a root span created at
/// builder time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fields {
    /// Service name (e.g. `"execution-worker"`).
    pub service: Option<String>,
    /// Deployment environment (e.g. `"production"`).
    pub env: Option<String>,
    /// Service version.
    pub version: Option<String>,
    /// Instance identifier, for distributed deployments.
    pub instance: Option<String>,
    /// Deployment region.
    pub region: Option<String>,
}

impl Fields {
    /// Whether every field is unset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.service.is_none()
            && self.env.is_none()
            && self.version.is_none()
            && self.instance.is_none()
            && self.region.is_none()
    }

    /// Reads `NEBULA_SERVICE` / `NEBULA_ENV` / `NEBULA_VERSION` /
    /// `NEBULA_INSTANCE` / `NEBULA_REGION`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            service: std::env::var("NEBULA_SERVICE").ok(),
            env: std::env::var("NEBULA_ENV").ok(),
            version: std::env::var("NEBULA_VERSION").ok(),
            instance: std::env::var("NEBULA_INSTANCE").ok(),
            region: std::env::var("NEBULA_REGION").ok(),
        }
    }
}

/// Rotation cadence for the `file` writer.
#[cfg(feature = "file")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Roll to a new file every hour.
    Hourly,
    /// Roll to a new file every day.
    Daily,
    /// Never roll; append to a single file.
    Never,
}

/// Where formatted log records are written.
#[derive(Debug, Clone, Default)]
pub enum WriterConfig {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
    /// A rolling file on disk. Requires the `file` feature.
    #[cfg(feature = "file")]
    File {
        /// Directory and base file name for the rolling appender.
        path: std::path::PathBuf,
        /// Roll cadence.
        rotation: Rotation,
    },
}

/// Top-level logger configuration: the input to [`crate::LoggerBuilder`].
#[derive(Debug, Clone)]
pub struct Config {
    /// `EnvFilter`-compatible level directive (e.g. `"info"`, `"debug,hyper=warn"`).
    pub level: String,
    /// Output format.
    pub format: Format,
    /// Display toggles layered on top of `format`.
    pub display: DisplayConfig,
    /// Global fields attached via the root span.
    pub fields: Fields,
    /// Where records are written.
    pub writer: WriterConfig,
    /// Whether the level filter can be reloaded at runtime via
    /// [`crate::builder::ReloadHandle`].
    pub reloadable: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::default(),
            display: DisplayConfig::default(),
            fields: Fields::default(),
            writer: WriterConfig::default(),
            reloadable: false,
        }
    }
}
