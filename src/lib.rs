//! Haraka runtime: lifecycle coordination for in-process service adapters.
//!
//! Adapters register with a priority and dependency names. The
//! [`Orchestrator`] resolves a dependency-safe start order, starts adapters
//! in it, supervises background tasks, exposes a readiness barrier, and on
//! `shutdown` or a termination signal tears everything down in reverse.

pub mod adapter;
pub mod config;
pub mod docs;
pub mod error;
pub mod lifecycle;
pub mod manifest;
pub mod observability;
pub mod readiness;
pub mod registry;

pub use adapter::{Adapter, ReadyReporter};
pub use config::RuntimeConfig;
pub use docs::ServeInfo;
pub use error::{BoxError, ConfigurationError, OrchestratorError, OrchestratorResult};
pub use lifecycle::{LifecycleState, Orchestrator};
pub use readiness::ReadinessBarrier;
pub use registry::Registry;
