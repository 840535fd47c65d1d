//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use serde::{Deserialize, Serialize};

use crate::docs::{ServeInfo, DEFAULT_DOCS_PATH};

/// Root configuration for the runtime.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime identity used in log lines.
    pub variant: String,

    /// Readiness barrier settings.
    pub readiness: ReadinessConfig,

    /// Hosting application's docs endpoint.
    pub docs: DocsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Adapter manifest discovery.
    pub manifests: ManifestConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            variant: "haraka".to_string(),
            readiness: ReadinessConfig::default(),
            docs: DocsConfig::default(),
            observability: ObservabilityConfig::default(),
            manifests: ManifestConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// How long to wait for every adapter to report ready, in seconds.
    pub timeout_secs: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Docs endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Port the application serves on. Unset disables the docs URL line.
    pub port: Option<u16>,

    /// Path of the docs UI.
    pub path: String,

    /// Host for the network URL; probed from the local interface when unset.
    pub advertise_host: Option<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            port: None,
            path: DEFAULT_DOCS_PATH.to_string(),
            advertise_host: None,
        }
    }
}

impl ServeInfo for DocsConfig {
    fn port(&self) -> Option<u16> {
        self.port
    }

    fn docs_path(&self) -> Option<String> {
        Some(self.path.clone())
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Directory searched recursively for `adapter.toml` files.
    pub root: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            root: "services".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: RuntimeConfig = toml::from_str("").unwrap();
        assert_eq!(config.variant, "haraka");
        assert_eq!(config.readiness.timeout_secs, 30);
        assert_eq!(config.docs.path, "/docs");
        assert!(config.docs.port.is_none());
        assert_eq!(config.manifests.root, "services");
    }

    #[test]
    fn test_partial_sections() {
        let config: RuntimeConfig = toml::from_str(
            r#"
            variant = "edge"

            [docs]
            port = 8000
            path = "/app/docs"
            "#,
        )
        .unwrap();
        assert_eq!(config.variant, "edge");
        assert_eq!(config.docs.port(), Some(8000));
        assert_eq!(config.docs.docs_path().as_deref(), Some("/app/docs"));
        assert_eq!(config.observability.log_level, "info");
    }
}
