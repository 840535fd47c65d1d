//! Orchestrator lifecycle state machine.
//!
//! # States
//! - Uninitialized: registered, nothing started
//! - Started: every adapter started, background tasks launched
//! - Destroyed: torn down, terminal
//!
//! # State Transitions
//! ```text
//! Uninitialized → Started: run() completes
//! Started → Destroyed: shutdown() completes
//! ```
//!
//! # Design Decisions
//! - Monotonic: no state is revisited
//! - Out-of-order calls are logged no-ops, never errors

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Started,
    Destroyed,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Started => "started",
            LifecycleState::Destroyed => "destroyed",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
