//! Layered configuration loading: defaults, files, environment overrides,
//! schema validation, and optional hot reload.

pub mod core;
pub mod loaders;
pub mod validators;

pub use core::{
    Config, ConfigBuilder, ConfigError, ConfigFormat, ConfigLoader, ConfigResult,
    ConfigResultAggregator, ConfigResultExt, ConfigSource, ConfigValidator, ConfigWatcher,
    SourceMetadata, try_sources,
};

/// Commonly used types, re-exported for convenient glob imports.
pub mod prelude {
    pub use crate::{
        Config, ConfigBuilder, ConfigError, ConfigResult, ConfigSource, ConfigValidator,
    };
}
