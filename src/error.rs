//! Error types for the lifecycle coordinator.
//!
//! # Propagation
//! - Startup is fail-fast: `Configuration` and `ComponentStart` reach the
//!   caller of `run`.
//! - Shutdown is best-effort: `ComponentStop` and `TaskFailure` are logged
//!   and collected, never returned from `shutdown`.
//! - `ReadinessTimeout` fails only the `wait_for_all_ready` call that hit it.

use std::time::Duration;
use thiserror::Error;

/// Boxed error returned by adapters and background jobs.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Invalid dependency graph, detected while resolving the start order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// An adapter names a dependency that was never registered.
    #[error("Unknown dependency '{dependency}' for adapter '{adapter}'")]
    UnknownDependency { adapter: String, dependency: String },

    /// The node was reached again while it was still being visited.
    #[error("Circular dependency detected at {node}")]
    CircularDependency { node: String },
}

/// Errors surfaced by the orchestrator.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Start order could not be resolved.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// An adapter's `start` failed; remaining starts were skipped.
    #[error("Failed to start adapter '{adapter}': {source}")]
    ComponentStart {
        adapter: String,
        #[source]
        source: BoxError,
    },

    /// An adapter's `stop` failed during shutdown.
    #[error("Shutdown failed for adapter '{adapter}': {source}")]
    ComponentStop {
        adapter: String,
        #[source]
        source: BoxError,
    },

    /// Not every adapter signalled readiness before the deadline.
    #[error("Timed out after {timeout:?} waiting for adapters: {unready:?}")]
    ReadinessTimeout {
        timeout: Duration,
        unready: Vec<String>,
    },

    /// A supervised background job failed with something other than cancellation.
    #[error("Task '{task}' failed: {source}")]
    TaskFailure {
        task: String,
        #[source]
        source: BoxError,
    },
}

impl OrchestratorError {
    /// Short stable label for structured log fields.
    pub fn as_label(&self) -> &'static str {
        match self {
            OrchestratorError::Configuration(ConfigurationError::UnknownDependency { .. }) => {
                "unknown_dependency"
            }
            OrchestratorError::Configuration(ConfigurationError::CircularDependency { .. }) => {
                "circular_dependency"
            }
            OrchestratorError::ComponentStart { .. } => "component_start",
            OrchestratorError::ComponentStop { .. } => "component_stop",
            OrchestratorError::ReadinessTimeout { .. } => "readiness_timeout",
            OrchestratorError::TaskFailure { .. } => "task_failure",
        }
    }
}

/// Result type for orchestrator operations.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = ConfigurationError::UnknownDependency {
            adapter: "api".into(),
            dependency: "db".into(),
        };
        assert_eq!(err.to_string(), "Unknown dependency 'db' for adapter 'api'");

        let err = ConfigurationError::CircularDependency { node: "a".into() };
        assert!(err.to_string().contains("Circular dependency"));
    }

    #[test]
    fn test_readiness_timeout_lists_unready() {
        let err = OrchestratorError::ReadinessTimeout {
            timeout: Duration::from_millis(100),
            unready: vec!["cache".into(), "queue".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("cache"));
        assert!(msg.contains("queue"));
        assert_eq!(err.as_label(), "readiness_timeout");
    }

    #[test]
    fn test_configuration_converts_into_orchestrator_error() {
        let err: OrchestratorError = ConfigurationError::CircularDependency { node: "x".into() }.into();
        assert_eq!(err.as_label(), "circular_dependency");
    }
}
