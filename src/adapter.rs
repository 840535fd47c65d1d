//! Component contract.
//!
//! An adapter is any named unit with an async start/stop lifecycle. Adapters
//! are built by their owners (a manifest loader, application code) and handed
//! to the orchestrator as `Arc<dyn Adapter>`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BoxError;
use crate::readiness::ReadinessBarrier;

/// A lifecycle-managed service component.
///
/// `start` and `stop` run on the async runtime. Blocking synchronous work
/// inside them stalls a runtime worker and every adapter scheduled behind it;
/// move such work to `tokio::task::spawn_blocking`.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Unique name within one orchestrator.
    fn name(&self) -> &str;

    /// Receives the readiness capability once, when registration succeeds.
    fn attach(&self, _reporter: ReadyReporter) {}

    /// Bring the component up.
    async fn start(&self) -> Result<(), BoxError>;

    /// Tear the component down.
    async fn stop(&self) -> Result<(), BoxError>;
}

/// Readiness back-reference handed to an adapter at registration.
///
/// Holds the barrier only, never the orchestrator, so an adapter keeping its
/// reporter does not keep the orchestrator alive.
#[derive(Clone)]
pub struct ReadyReporter {
    name: String,
    barrier: Arc<ReadinessBarrier>,
}

impl ReadyReporter {
    pub(crate) fn new(name: impl Into<String>, barrier: Arc<ReadinessBarrier>) -> Self {
        Self {
            name: name.into(),
            barrier,
        }
    }

    /// Name this reporter signals for.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signal that the owning adapter is operational. Idempotent.
    pub fn mark_ready(&self) {
        self.barrier.mark_ready(&self.name);
    }
}

impl std::fmt::Debug for ReadyReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadyReporter").field("name", &self.name).finish()
    }
}
