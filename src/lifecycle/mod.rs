//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (orchestrator.rs → startup.rs):
//!     run() → subscribe signals → resolve start order → start adapters in order
//!           → launch supervised tasks → report docs URL → Started
//!
//! Shutdown (orchestrator.rs → supervisor.rs):
//!     shutdown() → cancel token → join every task → stop adapters in reverse
//!                → cleanup callbacks → Destroyed
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → spawn shutdown() once per signal; the state guard
//!     turns repeats into no-ops
//! ```
//!
//! # Design Decisions
//! - Ordered startup: dependencies first, priority breaks ties
//! - Fail fast on startup, best effort on shutdown
//! - No deadlines on run/shutdown: a hung adapter hangs the orchestrator
//! - Only the readiness wait has a timeout

pub mod orchestrator;
pub mod signals;
pub mod startup;
pub mod state;
pub mod supervisor;

pub use orchestrator::Orchestrator;
pub use signals::{ManualSignals, OsSignals, SignalSource, SignalStream, TerminationSignal};
pub use startup::resolve_start_order;
pub use state::LifecycleState;
pub use supervisor::{SupervisedTasks, TaskOutcome};
