//! Declarative adapter loading.
//!
//! # Data Flow
//! ```text
//! services/**/adapter.toml
//!     → loader.rs (discover, parse)
//!     → factory.rs (entrypoint → constructor, settings table)
//!     → Orchestrator::register_with(adapter, priority, dependencies)
//! ```
//!
//! # Design Decisions
//! - Entrypoints are factory keys; nothing is loaded dynamically
//! - Manifest errors are fatal to the load, never to an already running orchestrator

pub mod builtin;
pub mod factory;
pub mod loader;

use std::path::PathBuf;

use thiserror::Error;

use crate::error::BoxError;

pub use builtin::NoopAdapter;
pub use factory::{AdapterFactory, Settings};
pub use loader::{discover_manifests, load_adapter_from_manifest, load_all, AdapterManifest};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing 'entrypoint' in manifest: {}", .0.display())]
    MissingEntrypoint(PathBuf),

    #[error("Unknown adapter entrypoint: {0}")]
    UnknownEntrypoint(String),

    #[error("Failed to construct adapter '{entrypoint}': {source}")]
    Construct {
        entrypoint: String,
        #[source]
        source: BoxError,
    },
}
