//! Configuration management.

mod settings;

pub use settings::{
    AllocationSettings, AppConfig, AppSettings, AverageSource, LoggingConfig, MarketSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables use the `ALLOCATOR` prefix and `__` as section
/// separator, e.g. `ALLOCATOR__ALLOCATION__MODE=extreme`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("ALLOCATOR")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

/// Load the file if it exists, otherwise start from defaults. Environment
/// overrides apply in both cases.
pub fn load_or_default(path: &Path) -> Result<AppConfig, ConfigError> {
    if path.exists() {
        return load_config(path);
    }
    Config::builder()
        .add_source(
            Environment::with_prefix("ALLOCATOR")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
