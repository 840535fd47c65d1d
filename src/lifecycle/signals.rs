//! Termination signal delivery.
//!
//! # Responsibilities
//! - Abstract signal reception behind [`SignalSource`]
//! - Translate SIGINT/SIGTERM into [`TerminationSignal`] events
//! - Provide an in-process source for tests and embedding
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe), never raw handlers
//! - Subscription is explicit; dropping the stream unsubscribes
//! - Every signal occurrence is delivered; deduplicating shutdowns is the
//!   orchestrator's job

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// The conventional termination signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    Interrupt,
    Terminate,
}

impl std::fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationSignal::Interrupt => write!(f, "SIGINT"),
            TerminationSignal::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// A live subscription to termination signals.
pub struct SignalStream {
    rx: mpsc::UnboundedReceiver<TerminationSignal>,
    forwarder: Option<JoinHandle<()>>,
}

impl SignalStream {
    /// Next signal, or `None` once the source is gone.
    pub async fn recv(&mut self) -> Option<TerminationSignal> {
        self.rx.recv().await
    }
}

impl Drop for SignalStream {
    fn drop(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
    }
}

/// Something that can deliver termination signals.
pub trait SignalSource: Send + Sync {
    /// Start receiving signals. Must be called inside a Tokio runtime.
    fn subscribe(&self) -> std::io::Result<SignalStream>;
}

/// Process signals from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSignals;

impl SignalSource for OsSignals {
    #[cfg(unix)]
    fn subscribe(&self) -> std::io::Result<SignalStream> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;
        let (tx, rx) = mpsc::unbounded_channel();

        let forwarder = tokio::spawn(async move {
            loop {
                let received = tokio::select! {
                    Some(_) = sigint.recv() => TerminationSignal::Interrupt,
                    Some(_) = sigterm.recv() => TerminationSignal::Terminate,
                    else => break,
                };
                if tx.send(received).is_err() {
                    break;
                }
            }
        });

        Ok(SignalStream {
            rx,
            forwarder: Some(forwarder),
        })
    }

    #[cfg(not(unix))]
    fn subscribe(&self) -> std::io::Result<SignalStream> {
        let (tx, rx) = mpsc::unbounded_channel();

        let forwarder = tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if tx.send(TerminationSignal::Interrupt).is_err() {
                    break;
                }
            }
        });

        Ok(SignalStream {
            rx,
            forwarder: Some(forwarder),
        })
    }
}

/// Signals raised by code instead of the OS.
#[derive(Debug, Default)]
pub struct ManualSignals {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<TerminationSignal>>>,
}

impl ManualSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `signal` to every live subscriber.
    pub fn raise(&self, signal: TerminationSignal) {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(signal).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }
}

impl SignalSource for ManualSignals {
    fn subscribe(&self) -> std::io::Result<SignalStream> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        Ok(SignalStream { rx, forwarder: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manual_signals_reach_subscriber() {
        let source = ManualSignals::new();
        let mut stream = source.subscribe().unwrap();
        assert_eq!(source.subscriber_count(), 1);

        source.raise(TerminationSignal::Terminate);
        source.raise(TerminationSignal::Interrupt);
        assert_eq!(stream.recv().await, Some(TerminationSignal::Terminate));
        assert_eq!(stream.recv().await, Some(TerminationSignal::Interrupt));
    }

    #[tokio::test]
    async fn test_dropping_stream_unsubscribes() {
        let source = ManualSignals::new();
        let stream = source.subscribe().unwrap();
        drop(stream);
        assert_eq!(source.subscriber_count(), 0);
    }

    #[test]
    fn test_signal_display() {
        assert_eq!(TerminationSignal::Interrupt.to_string(), "SIGINT");
        assert_eq!(TerminationSignal::Terminate.to_string(), "SIGTERM");
    }
}
