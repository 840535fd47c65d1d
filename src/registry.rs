//! Adapter registry.
//!
//! Insertion-ordered map from adapter name to its registration. Nothing is
//! validated here beyond name uniqueness; dependency names are checked when
//! the start order is resolved.

use std::sync::Arc;

use crate::adapter::Adapter;

/// One registered adapter with its ordering metadata.
#[derive(Clone)]
pub struct Registration {
    pub adapter: Arc<dyn Adapter>,
    /// Tie-break among adapters with no dependency relation; higher starts first.
    pub priority: i32,
    /// Names that must start before this adapter, in declared order.
    pub dependencies: Vec<String>,
}

impl Registration {
    pub fn name(&self) -> &str {
        self.adapter.name()
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name())
            .field("priority", &self.priority)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

#[derive(Debug, Default, Clone)]
pub struct Registry {
    entries: Vec<Registration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. The first registration under a name wins; a later one
    /// with the same name is dropped and `false` is returned.
    pub fn insert(&mut self, registration: Registration) -> bool {
        if self.contains(registration.name()) {
            return false;
        }
        self.entries.push(registration);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Registration> {
        self.entries.iter().find(|e| e.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn priority_of(&self, name: &str) -> Option<i32> {
        self.get(name).map(|e| e.priority)
    }

    pub fn dependencies_of(&self, name: &str) -> Option<&[String]> {
        self.get(name).map(|e| e.dependencies.as_slice())
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name().to_string()).collect()
    }

    pub fn entries(&self) -> &[Registration] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use async_trait::async_trait;

    struct Named(&'static str);

    #[async_trait]
    impl Adapter for Named {
        fn name(&self) -> &str {
            self.0
        }
        async fn start(&self) -> Result<(), BoxError> {
            Ok(())
        }
        async fn stop(&self) -> Result<(), BoxError> {
            Ok(())
        }
    }

    fn reg(name: &'static str, priority: i32, deps: &[&str]) -> Registration {
        Registration {
            adapter: Arc::new(Named(name)),
            priority,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn test_insert_records_metadata() {
        let mut registry = Registry::new();
        assert!(registry.insert(reg("svc", 7, &["depX", "depY"])));
        assert_eq!(registry.priority_of("svc"), Some(7));
        assert_eq!(
            registry.dependencies_of("svc"),
            Some(&["depX".to_string(), "depY".to_string()][..])
        );
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut registry = Registry::new();
        assert!(registry.insert(reg("a", 1, &[])));
        assert!(!registry.insert(reg("a", 99, &["b"])));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.priority_of("a"), Some(1));
        assert!(registry.dependencies_of("a").unwrap().is_empty());
    }

    #[test]
    fn test_names_preserve_registration_order() {
        let mut registry = Registry::new();
        registry.insert(reg("c", 0, &[]));
        registry.insert(reg("a", 0, &[]));
        registry.insert(reg("b", 0, &[]));
        assert_eq!(registry.names(), vec!["c", "a", "b"]);
    }
}
