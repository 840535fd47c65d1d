//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator, readiness barrier, supervisor, manifest loader
//!     → tracing events with structured fields
//!     → logging.rs (EnvFilter + fmt layer)
//!     → stdout
//! ```

pub mod logging;

pub use logging::init_logging;
