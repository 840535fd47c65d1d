//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RuntimeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub readiness_timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut RuntimeConfig) {
        if let Some(secs) = self.readiness_timeout_secs {
            config.readiness.timeout_secs = secs;
        }
    }
}

fn validated(config: RuntimeConfig) -> Result<RuntimeConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RuntimeConfig, ConfigError> {
    validated(toml::from_str(content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RuntimeConfig, ConfigError> {
    load_config_with(Some(path), &ConfigOverrides::default())
}

/// Load `path` (or defaults when `None`), apply `overrides`, then validate.
pub fn load_config_with(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<RuntimeConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let config: RuntimeConfig = toml::from_str(&fs::read_to_string(path)?)?;
            tracing::debug!(path = %path.display(), variant = %config.variant, "Configuration loaded");
            config
        }
        None => RuntimeConfig::default(),
    };
    overrides.apply(&mut config);
    validated(config)
}
