//! Supervised background tasks.
//!
//! # Responsibilities
//! - Run each background job on its own Tokio task
//! - Turn cancellation into an informational outcome
//! - Log failures and hand them to whoever joins the task
//!
//! # Design Decisions
//! - No restarts: a failed job stays failed, other jobs keep running
//! - Cancellation is cooperative: every task gets a child of one
//!   [`CancellationToken`]
//! - `cancel_and_join` waits for every task to reach a terminal state

use std::future::Future;
use std::pin::Pin;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{BoxError, OrchestratorError, OrchestratorResult};

/// A boxed background job future.
pub type Job = Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'static>>;

/// A deferred job: called once when the task is launched.
pub type JobFn = Box<dyn FnOnce() -> Job + Send + 'static>;

/// Box a closure returning a future into a [`JobFn`].
pub fn job_fn<F, Fut>(f: F) -> JobFn
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    Box::new(move || Box::pin(f()) as Job)
}

/// Non-failure terminal states of a supervised task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    Cancelled,
}

/// Run `job` until it finishes or `cancel` fires.
pub async fn supervise(
    name: &str,
    job: Job,
    cancel: CancellationToken,
) -> OrchestratorResult<TaskOutcome> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::info!(task = %name, "Task cancelled");
            Ok(TaskOutcome::Cancelled)
        }
        result = job => match result {
            Ok(()) => {
                tracing::debug!(task = %name, "Task completed");
                Ok(TaskOutcome::Completed)
            }
            Err(e) => {
                tracing::error!(task = %name, error = %e, "Task failed");
                Err(OrchestratorError::TaskFailure {
                    task: name.to_string(),
                    source: e,
                })
            }
        }
    }
}

/// The set of background tasks launched by one run.
#[derive(Default)]
pub struct SupervisedTasks {
    cancel: CancellationToken,
    handles: Vec<(String, JoinHandle<OrchestratorResult<TaskOutcome>>)>,
}

impl SupervisedTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch a job under supervision without waiting for it.
    pub fn spawn(&mut self, name: impl Into<String>, job: JobFn) {
        let name = name.into();
        let cancel = self.cancel.child_token();
        let task_name = name.clone();
        let handle = tokio::spawn(async move { supervise(&task_name, job(), cancel).await });
        tracing::debug!(task = %name, "Task launched");
        self.handles.push((name, handle));
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Cancel every task and wait for all of them to finish.
    ///
    /// Outcomes are returned in launch order; failures are not propagated.
    pub async fn cancel_and_join(&mut self) -> Vec<(String, OrchestratorResult<TaskOutcome>)> {
        self.cancel.cancel();

        let mut outcomes = Vec::with_capacity(self.handles.len());
        for (name, handle) in self.handles.drain(..) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    tracing::error!(task = %name, error = %join_error, "Task aborted");
                    Err(OrchestratorError::TaskFailure {
                        task: name.clone(),
                        source: Box::new(join_error),
                    })
                }
            };
            outcomes.push((name, outcome));
        }
        outcomes
    }
}
