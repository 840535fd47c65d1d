//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeout > 0, path shape, log level)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RuntimeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use crate::config::schema::RuntimeConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("variant must not be empty")]
    EmptyVariant,

    #[error("readiness.timeout_secs must be greater than zero")]
    ZeroReadinessTimeout,

    #[error("docs.path must start with '/', got '{0}'")]
    InvalidDocsPath(String),

    #[error("observability.log_level '{0}' is not a valid level")]
    InvalidLogLevel(String),
}

pub fn validate_config(config: &RuntimeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.variant.trim().is_empty() {
        errors.push(ValidationError::EmptyVariant);
    }

    if config.readiness.timeout_secs == 0 {
        errors.push(ValidationError::ZeroReadinessTimeout);
    }

    if !config.docs.path.starts_with('/') {
        errors.push(ValidationError::InvalidDocsPath(config.docs.path.clone()));
    }

    if LevelFilter::from_str(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RuntimeConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = RuntimeConfig::default();
        config.variant = " ".into();
        config.readiness.timeout_secs = 0;
        config.docs.path = "docs".into();
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyVariant,
                ValidationError::ZeroReadinessTimeout,
                ValidationError::InvalidDocsPath("docs".into()),
                ValidationError::InvalidLogLevel("loud".into()),
            ]
        );
    }
}
