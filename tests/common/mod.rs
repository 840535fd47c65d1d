//! Shared helpers for orchestrator integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use haraka_runtime::lifecycle::ManualSignals;
use haraka_runtime::{Adapter, BoxError, Orchestrator, ReadyReporter, ServeInfo};

/// Ordered log shared by every adapter in a test.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.starts_with(prefix))
            .collect()
    }
}

/// Adapter that records `start:<name>` / `stop:<name>` into an [`EventLog`].
pub struct RecordingAdapter {
    name: String,
    log: EventLog,
    fail_start: bool,
    fail_stop: bool,
    ready_after: Option<Duration>,
    reporter: OnceLock<ReadyReporter>,
    pub starts: AtomicUsize,
}

impl RecordingAdapter {
    pub fn new(name: &str, log: &EventLog) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            fail_start: false,
            fail_stop: false,
            ready_after: None,
            reporter: OnceLock::new(),
            starts: AtomicUsize::new(0),
        }
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    /// Report ready from a background task `delay` after start.
    pub fn ready_after(mut self, delay: Duration) -> Self {
        self.ready_after = Some(delay);
        self
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Adapter for RecordingAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn attach(&self, reporter: ReadyReporter) {
        let _ = self.reporter.set(reporter);
    }

    async fn start(&self) -> Result<(), BoxError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            return Err(format!("{} refused to start", self.name).into());
        }
        self.log.push(format!("start:{}", self.name));
        if let (Some(delay), Some(reporter)) = (self.ready_after, self.reporter.get()) {
            let reporter = reporter.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                reporter.mark_ready();
            });
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), BoxError> {
        self.log.push(format!("stop:{}", self.name));
        if self.fail_stop {
            return Err(format!("{} refused to stop", self.name).into());
        }
        Ok(())
    }
}

/// Hosting application stand-in.
pub struct FakeApp {
    pub port: Option<u16>,
}

impl ServeInfo for FakeApp {
    fn port(&self) -> Option<u16> {
        self.port
    }

    fn docs_path(&self) -> Option<String> {
        Some("/foo".to_string())
    }
}

pub fn app() -> FakeApp {
    FakeApp { port: Some(1234) }
}

/// Orchestrator wired to in-process signals and a fixed docs host.
pub fn orchestrator() -> (Arc<Orchestrator>, Arc<ManualSignals>) {
    let signals = Arc::new(ManualSignals::new());
    let orchestrator = Orchestrator::new("test")
        .with_signals(signals.clone())
        .with_advertise_host("127.0.0.1");
    (Arc::new(orchestrator), signals)
}
