//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RuntimeConfig (validated, immutable)
//!     → Orchestrator::from_config, logging, manifest discovery
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, parse_config, ConfigError, ConfigOverrides};
pub use schema::RuntimeConfig;
pub use schema::{DocsConfig, ManifestConfig, ObservabilityConfig, ReadinessConfig};
pub use validation::ValidationError;
