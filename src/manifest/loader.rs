//! Manifest parsing, discovery and registration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::adapter::Adapter;
use crate::lifecycle::Orchestrator;
use crate::manifest::factory::{AdapterFactory, Settings};
use crate::manifest::ManifestError;

/// File name searched for by [`discover_manifests`].
pub const MANIFEST_FILE_NAME: &str = "adapter.toml";

/// Declarative adapter definition.
#[derive(Debug, Clone, Deserialize)]
pub struct AdapterManifest {
    /// Factory key of the adapter to build.
    pub entrypoint: Option<String>,

    #[serde(default)]
    pub priority: i32,

    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Passed verbatim to the constructor.
    #[serde(default)]
    pub settings: Settings,
}

pub fn read_manifest(path: &Path) -> Result<AdapterManifest, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the adapter a manifest describes and register it.
///
/// Returns the built adapter even when its name was already registered; the
/// orchestrator keeps the earlier registration in that case.
pub fn load_adapter_from_manifest(
    path: &Path,
    factory: &AdapterFactory,
    orchestrator: &Orchestrator,
) -> Result<Arc<dyn Adapter>, ManifestError> {
    let manifest = read_manifest(path)?;

    let entrypoint = manifest
        .entrypoint
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ManifestError::MissingEntrypoint(path.to_path_buf()))?;

    let adapter = factory.build(entrypoint, &manifest.settings)?;
    orchestrator.register_with(adapter.clone(), manifest.priority, manifest.dependencies);

    tracing::debug!(
        path = %path.display(),
        entrypoint = %entrypoint,
        adapter = %adapter.name(),
        "Loaded adapter manifest"
    );
    Ok(adapter)
}

/// Recursively collect manifest files under `root`, sorted by path.
pub fn discover_manifests(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                pending.push(path);
            } else if path.file_name().is_some_and(|n| n == MANIFEST_FILE_NAME) {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

/// Discover and load every manifest under `root`.
///
/// Stops at the first manifest that fails to load.
pub fn load_all(
    root: &Path,
    factory: &AdapterFactory,
    orchestrator: &Orchestrator,
) -> Result<Vec<Arc<dyn Adapter>>, ManifestError> {
    let paths = discover_manifests(root).map_err(|source| ManifestError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    paths
        .iter()
        .map(|path| load_adapter_from_manifest(path, factory, orchestrator))
        .collect()
}
