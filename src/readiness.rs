//! Readiness barrier.
//!
//! One latch per registered adapter. Adapters set their own latch from inside
//! their start logic; `wait_for_all_ready` suspends until every latch is set
//! or the deadline passes. Latches are never reset.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;

use crate::error::{OrchestratorError, OrchestratorResult};

/// Set of readiness latches keyed by adapter name, in registration order.
#[derive(Debug, Default)]
pub struct ReadinessBarrier {
    signals: Mutex<Vec<(String, watch::Sender<bool>)>>,
}

impl ReadinessBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    fn signals(&self) -> MutexGuard<'_, Vec<(String, watch::Sender<bool>)>> {
        self.signals.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocate an unset latch. Returns false if the name already has one.
    pub(crate) fn insert(&self, name: &str) -> bool {
        let mut signals = self.signals();
        if signals.iter().any(|(n, _)| n == name) {
            return false;
        }
        let (tx, _) = watch::channel(false);
        signals.push((name.to_string(), tx));
        true
    }

    /// Set the latch for `name`.
    ///
    /// Repeated calls are no-ops. An unknown name is logged and ignored.
    pub fn mark_ready(&self, name: &str) {
        let signals = self.signals();
        match signals.iter().find(|(n, _)| n == name) {
            Some((_, tx)) => {
                let newly_set = tx.send_if_modified(|ready| {
                    if *ready {
                        false
                    } else {
                        *ready = true;
                        true
                    }
                });
                if newly_set {
                    tracing::info!(adapter = %name, "Adapter is ready");
                } else {
                    tracing::debug!(adapter = %name, "Adapter was already marked ready");
                }
            }
            None => {
                tracing::warn!(adapter = %name, "Tried to mark unknown adapter as ready");
            }
        }
    }

    /// Whether `name` has signalled. `None` for unknown names.
    pub fn is_ready(&self, name: &str) -> Option<bool> {
        self.signals()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, tx)| *tx.borrow())
    }

    /// Names still waiting, in registration order.
    pub fn unready(&self) -> Vec<String> {
        self.signals()
            .iter()
            .filter(|(_, tx)| !*tx.borrow())
            .map(|(n, _)| n.clone())
            .collect()
    }

    /// Wait until every latch registered at call time is set.
    ///
    /// Fails with [`OrchestratorError::ReadinessTimeout`] naming every
    /// adapter still unset when `timeout` elapses.
    pub async fn wait_for_all_ready(&self, timeout: Duration) -> OrchestratorResult<()> {
        let mut receivers: Vec<(String, watch::Receiver<bool>)> = self
            .signals()
            .iter()
            .map(|(n, tx)| (n.clone(), tx.subscribe()))
            .collect();

        let all_ready = async {
            for (_, rx) in receivers.iter_mut() {
                if rx.wait_for(|ready| *ready).await.is_err() {
                    // Sender gone: this latch can never be set.
                    std::future::pending::<()>().await;
                }
            }
        };

        let outcome = tokio::time::timeout(timeout, all_ready).await;
        match outcome {
            Ok(()) => {
                tracing::info!(count = receivers.len(), "All declared adapters are up and running");
                Ok(())
            }
            Err(_) => {
                let unready: Vec<String> = receivers
                    .iter()
                    .filter(|(_, rx)| !*rx.borrow())
                    .map(|(n, _)| n.clone())
                    .collect();
                tracing::error!(
                    timeout_ms = timeout.as_millis() as u64,
                    unready_adapters = ?unready,
                    "Timed out waiting for adapters"
                );
                Err(OrchestratorError::ReadinessTimeout { timeout, unready })
            }
        }
    }
}
