//! Entrypoint → constructor table.
//!
//! Manifests name an entrypoint string; the factory maps it to a closure that
//! builds the adapter from the manifest's `[settings]` table.

use std::collections::HashMap;
use std::sync::Arc;

use crate::adapter::Adapter;
use crate::error::BoxError;
use crate::manifest::builtin::NoopAdapter;
use crate::manifest::ManifestError;

/// Settings table passed to constructors.
pub type Settings = toml::Table;

type Constructor = Box<dyn Fn(&Settings) -> Result<Arc<dyn Adapter>, BoxError> + Send + Sync>;

#[derive(Default)]
pub struct AdapterFactory {
    constructors: HashMap<String, Constructor>,
}

impl AdapterFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory preloaded with the adapters shipped in this crate.
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory.register(NoopAdapter::ENTRYPOINT, |settings| {
            Ok(Arc::new(NoopAdapter::from_settings(settings)?) as Arc<dyn Adapter>)
        });
        factory
    }

    /// Bind `entrypoint` to a constructor, replacing any previous binding.
    pub fn register<F>(&mut self, entrypoint: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&Settings) -> Result<Arc<dyn Adapter>, BoxError> + Send + Sync + 'static,
    {
        self.constructors.insert(entrypoint.into(), Box::new(constructor));
        self
    }

    pub fn contains(&self, entrypoint: &str) -> bool {
        self.constructors.contains_key(entrypoint)
    }

    /// Known entrypoints, sorted.
    pub fn entrypoints(&self) -> Vec<String> {
        let mut names: Vec<String> = self.constructors.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn build(&self, entrypoint: &str, settings: &Settings) -> Result<Arc<dyn Adapter>, ManifestError> {
        let constructor = self
            .constructors
            .get(entrypoint)
            .ok_or_else(|| ManifestError::UnknownEntrypoint(entrypoint.to_string()))?;
        constructor(settings).map_err(|source| ManifestError::Construct {
            entrypoint: entrypoint.to_string(),
            source,
        })
    }
}
