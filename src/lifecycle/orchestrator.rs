//! The lifecycle orchestrator.
//!
//! Owns the registry, the readiness barrier, the background task set and the
//! lifecycle state. Startup is fail-fast; shutdown is best-effort and always
//! reaches `Destroyed`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::adapter::{Adapter, ReadyReporter};
use crate::config::RuntimeConfig;
use crate::docs::{report_docs_url, ServeInfo};
use crate::error::{BoxError, OrchestratorError, OrchestratorResult};
use crate::lifecycle::signals::{OsSignals, SignalSource};
use crate::lifecycle::startup::resolve_start_order;
use crate::lifecycle::state::LifecycleState;
use crate::lifecycle::supervisor::{job_fn, JobFn, SupervisedTasks, TaskOutcome};
use crate::readiness::ReadinessBarrier;
use crate::registry::{Registration, Registry};

/// Mutable lifecycle bookkeeping, guarded by one lock.
struct Lifecycle {
    state: LifecycleState,
    /// Set while `run` or `shutdown` is between its guard and its final transition.
    transitioning: bool,
    /// Start order of the successful run, reversed for shutdown.
    started: Vec<Arc<dyn Adapter>>,
    tasks: Option<SupervisedTasks>,
    signal_listener: Option<JoinHandle<()>>,
}

pub struct Orchestrator {
    variant: String,
    advertise_host: Option<String>,
    registry: Mutex<Registry>,
    barrier: Arc<ReadinessBarrier>,
    lifecycle: Mutex<Lifecycle>,
    state_tx: watch::Sender<LifecycleState>,
    startup_tasks: Mutex<Vec<(String, JobFn)>>,
    shutdown_tasks: Mutex<Vec<(String, JobFn)>>,
    signals: Arc<dyn SignalSource>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Orchestrator {
    /// Create an orchestrator listening to OS termination signals.
    pub fn new(variant: impl Into<String>) -> Self {
        let (state_tx, _) = watch::channel(LifecycleState::Uninitialized);
        Self {
            variant: variant.into(),
            advertise_host: None,
            registry: Mutex::new(Registry::new()),
            barrier: Arc::new(ReadinessBarrier::new()),
            lifecycle: Mutex::new(Lifecycle {
                state: LifecycleState::Uninitialized,
                transitioning: false,
                started: Vec::new(),
                tasks: None,
                signal_listener: None,
            }),
            state_tx,
            startup_tasks: Mutex::new(Vec::new()),
            shutdown_tasks: Mutex::new(Vec::new()),
            signals: Arc::new(OsSignals),
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        let mut orchestrator = Self::new(config.variant.clone());
        orchestrator.advertise_host = config.docs.advertise_host.clone();
        orchestrator
    }

    /// Replace the signal source subscribed to at `run`.
    pub fn with_signals(mut self, signals: Arc<dyn SignalSource>) -> Self {
        self.signals = signals;
        self
    }

    /// Host used for the network docs URL instead of probing.
    pub fn with_advertise_host(mut self, host: impl Into<String>) -> Self {
        self.advertise_host = Some(host.into());
        self
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn state(&self) -> LifecycleState {
        lock(&self.lifecycle).state
    }

    /// Register with priority 0 and no dependencies.
    pub fn register(&self, adapter: Arc<dyn Adapter>) -> bool {
        self.register_with(adapter, 0, Vec::<String>::new())
    }

    /// Register an adapter.
    ///
    /// A name already present is left untouched and `false` is returned.
    /// On success the adapter gets its [`ReadyReporter`].
    pub fn register_with<I, S>(&self, adapter: Arc<dyn Adapter>, priority: i32, dependencies: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = adapter.name().to_string();
        let dependencies: Vec<String> = dependencies.into_iter().map(Into::into).collect();

        let inserted = lock(&self.registry).insert(Registration {
            adapter: adapter.clone(),
            priority,
            dependencies: dependencies.clone(),
        });
        if !inserted {
            tracing::warn!(adapter = %name, "Adapter already registered");
            return false;
        }

        self.barrier.insert(&name);
        adapter.attach(ReadyReporter::new(name.clone(), self.barrier.clone()));
        tracing::debug!(
            adapter = %name,
            priority,
            dependencies = ?dependencies,
            "Registered adapter"
        );
        true
    }

    /// Snapshot of the registry.
    pub fn registry(&self) -> Registry {
        lock(&self.registry).clone()
    }

    pub fn readiness(&self) -> Arc<ReadinessBarrier> {
        self.barrier.clone()
    }

    pub fn mark_ready(&self, name: &str) {
        self.barrier.mark_ready(name);
    }

    pub async fn wait_for_all_ready(&self, timeout: Duration) -> OrchestratorResult<()> {
        self.barrier.wait_for_all_ready(timeout).await
    }

    /// Current start order without side effects.
    pub fn resolve_start_order(&self) -> OrchestratorResult<Vec<Arc<dyn Adapter>>> {
        let registry = lock(&self.registry);
        Ok(resolve_start_order(&registry)?)
    }

    /// Background job launched under supervision when `run` succeeds.
    pub fn add_startup_task<F, Fut>(&self, name: impl Into<String>, job: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        lock(&self.startup_tasks).push((name.into(), job_fn(job)));
    }

    /// Cleanup callback run after adapters are stopped.
    pub fn add_shutdown_task<F, Fut>(&self, name: impl Into<String>, job: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        lock(&self.shutdown_tasks).push((name.into(), job_fn(job)));
    }

    /// Start every adapter in dependency order and launch background tasks.
    ///
    /// A no-op unless the state is `Uninitialized`. On error the state stays
    /// `Uninitialized`; adapters started before the failing one are not stopped.
    pub async fn run(self: &Arc<Self>, app: &dyn ServeInfo) -> OrchestratorResult<()> {
        {
            let mut lifecycle = lock(&self.lifecycle);
            if lifecycle.state != LifecycleState::Uninitialized || lifecycle.transitioning {
                tracing::warn!(state = %lifecycle.state, "Already started or shut down");
                return Ok(());
            }
            lifecycle.transitioning = true;
        }

        tracing::info!(variant = %self.variant, "Starting runtime");
        self.subscribe_signals();

        let order = match self.resolve_start_order() {
            Ok(order) => order,
            Err(e) => {
                tracing::error!(error = %e, "Failed to resolve start order");
                self.abort_startup();
                return Err(e);
            }
        };

        for adapter in &order {
            if let Err(source) = adapter.start().await {
                let err = OrchestratorError::ComponentStart {
                    adapter: adapter.name().to_string(),
                    source,
                };
                tracing::error!(adapter = %adapter.name(), error = %err, "Failed to start adapter");
                self.abort_startup();
                return Err(err);
            }
            tracing::info!(adapter = %adapter.name(), "Started adapter");
        }

        let mut tasks = SupervisedTasks::new();
        let startup_tasks = std::mem::take(&mut *lock(&self.startup_tasks));
        for (name, job) in startup_tasks {
            tasks.spawn(name, job);
        }

        report_docs_url(app, self.advertise_host.as_deref());

        {
            let mut lifecycle = lock(&self.lifecycle);
            lifecycle.started = order;
            lifecycle.tasks = Some(tasks);
            lifecycle.state = LifecycleState::Started;
            lifecycle.transitioning = false;
        }
        self.state_tx.send_replace(LifecycleState::Started);
        tracing::info!(variant = %self.variant, "Runtime started");
        Ok(())
    }

    /// Cancel background tasks, stop adapters in reverse start order, run
    /// cleanup callbacks. A no-op unless the state is `Started`.
    ///
    /// Never fails; individual stop and cleanup errors are logged.
    pub async fn shutdown(&self) {
        let (started, tasks) = {
            let mut lifecycle = lock(&self.lifecycle);
            if lifecycle.state != LifecycleState::Started || lifecycle.transitioning {
                tracing::warn!(state = %lifecycle.state, "Not running or already destroyed");
                return;
            }
            lifecycle.transitioning = true;
            (std::mem::take(&mut lifecycle.started), lifecycle.tasks.take())
        };

        tracing::info!(variant = %self.variant, "Application is shutting down");

        if let Some(mut tasks) = tasks {
            let outcomes = tasks.cancel_and_join().await;
            let failed = outcomes.iter().filter(|(_, o)| o.is_err()).count();
            let cancelled = outcomes
                .iter()
                .filter(|(_, o)| matches!(o, Ok(TaskOutcome::Cancelled)))
                .count();
            tracing::debug!(total = outcomes.len(), cancelled, failed, "Background tasks joined");
        }

        for adapter in started.iter().rev() {
            match adapter.stop().await {
                Ok(()) => tracing::info!(adapter = %adapter.name(), "Stopped adapter"),
                Err(source) => {
                    let err = OrchestratorError::ComponentStop {
                        adapter: adapter.name().to_string(),
                        source,
                    };
                    tracing::error!(adapter = %adapter.name(), error = %err, "Shutdown failed for adapter");
                }
            }
        }

        let cleanups = std::mem::take(&mut *lock(&self.shutdown_tasks));
        for (name, job) in cleanups {
            if let Err(e) = job().await {
                tracing::error!(task = %name, error = %e, "Shutdown task failed");
            }
        }

        let listener = {
            let mut lifecycle = lock(&self.lifecycle);
            lifecycle.state = LifecycleState::Destroyed;
            lifecycle.transitioning = false;
            lifecycle.signal_listener.take()
        };
        if let Some(listener) = listener {
            listener.abort();
        }
        self.state_tx.send_replace(LifecycleState::Destroyed);
        tracing::info!(variant = %self.variant, "Shutdown complete");
    }

    /// Resolves once the orchestrator reaches `Destroyed`.
    pub async fn wait_until_destroyed(&self) {
        let mut rx = self.state_tx.subscribe();
        let _ = rx.wait_for(|state| *state == LifecycleState::Destroyed).await;
    }

    /// Listen for termination signals; each one schedules a shutdown.
    fn subscribe_signals(self: &Arc<Self>) {
        let mut stream = match self.signals.subscribe() {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install signal handlers");
                return;
            }
        };

        let weak = Arc::downgrade(self);
        let listener = tokio::spawn(async move {
            while let Some(signal) = stream.recv().await {
                let Some(orchestrator) = weak.upgrade() else {
                    break;
                };
                tracing::info!(signal = %signal, "Received signal, initiating shutdown");
                tokio::spawn(async move {
                    orchestrator.shutdown().await;
                });
            }
        });

        if let Some(previous) = lock(&self.lifecycle).signal_listener.replace(listener) {
            previous.abort();
        }
    }

    fn abort_startup(&self) {
        let listener = {
            let mut lifecycle = lock(&self.lifecycle);
            lifecycle.transitioning = false;
            lifecycle.signal_listener.take()
        };
        if let Some(listener) = listener {
            listener.abort();
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("variant", &self.variant)
            .field("state", &self.state())
            .field("adapters", &lock(&self.registry).names())
            .finish()
    }
}
