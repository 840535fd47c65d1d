//! Readiness barrier and signal-driven shutdown through the orchestrator.

use std::sync::Arc;
use std::time::Duration;

use haraka_runtime::lifecycle::TerminationSignal;
use haraka_runtime::{LifecycleState, OrchestratorError};

mod common;
use common::{app, orchestrator, EventLog, RecordingAdapter};

#[tokio::test]
async fn test_wait_for_all_ready_completes() {
    let log = EventLog::default();
    let (orch, _signals) = orchestrator();
    orch.register(Arc::new(RecordingAdapter::new("svc1", &log).ready_after(Duration::from_millis(10))));
    orch.register(Arc::new(RecordingAdapter::new("svc2", &log).ready_after(Duration::from_millis(20))));

    orch.run(&app()).await.unwrap();

    let started = tokio::time::Instant::now();
    orch.wait_for_all_ready(Duration::from_secs(1)).await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(orch.readiness().unready().is_empty());
}

#[tokio::test]
async fn test_wait_for_all_ready_times_out_with_unready_names() {
    let log = EventLog::default();
    let (orch, _signals) = orchestrator();
    orch.register(Arc::new(RecordingAdapter::new("quick", &log).ready_after(Duration::from_millis(1))));
    orch.register(Arc::new(RecordingAdapter::new("never", &log)));

    orch.run(&app()).await.unwrap();
    let err = orch.wait_for_all_ready(Duration::from_millis(100)).await.unwrap_err();

    match err {
        OrchestratorError::ReadinessTimeout { unready, .. } => assert_eq!(unready, vec!["never"]),
        other => panic!("unexpected error: {other}"),
    }
    // A readiness timeout does not touch lifecycle state.
    assert_eq!(orch.state(), LifecycleState::Started);
}

#[tokio::test]
async fn test_mark_ready_through_orchestrator() {
    let log = EventLog::default();
    let (orch, _signals) = orchestrator();
    orch.register(Arc::new(RecordingAdapter::new("X", &log)));
    orch.register(Arc::new(RecordingAdapter::new("Y", &log)));

    orch.mark_ready("Y");
    orch.mark_ready("X");
    orch.mark_ready("X");
    orch.mark_ready("unknown");

    orch.wait_for_all_ready(Duration::from_millis(100)).await.unwrap();
}

#[tokio::test]
async fn test_signal_triggers_shutdown() {
    let log = EventLog::default();
    let (orch, signals) = orchestrator();
    orch.register(Arc::new(RecordingAdapter::new("svc", &log)));
    orch.run(&app()).await.unwrap();

    signals.raise(TerminationSignal::Terminate);

    tokio::time::timeout(Duration::from_secs(1), orch.wait_until_destroyed())
        .await
        .expect("shutdown was not triggered");
    assert_eq!(orch.state(), LifecycleState::Destroyed);
    assert_eq!(log.with_prefix("stop"), vec!["stop:svc"]);
}

#[tokio::test]
async fn test_back_to_back_signals_tear_down_once() {
    let log = EventLog::default();
    let (orch, signals) = orchestrator();
    orch.register_with(Arc::new(RecordingAdapter::new("a", &log)), 0, Vec::<String>::new());
    orch.register_with(Arc::new(RecordingAdapter::new("b", &log)), 0, ["a"]);
    orch.run(&app()).await.unwrap();

    signals.raise(TerminationSignal::Interrupt);
    signals.raise(TerminationSignal::Terminate);
    signals.raise(TerminationSignal::Interrupt);

    tokio::time::timeout(Duration::from_secs(1), orch.wait_until_destroyed())
        .await
        .expect("shutdown was not triggered");
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(log.with_prefix("stop"), vec!["stop:b", "stop:a"]);
}

#[tokio::test]
async fn test_signal_subscription_released_after_destroy() {
    let log = EventLog::default();
    let (orch, signals) = orchestrator();
    orch.register(Arc::new(RecordingAdapter::new("svc", &log)));

    assert_eq!(signals.subscriber_count(), 0);
    orch.run(&app()).await.unwrap();
    assert_eq!(signals.subscriber_count(), 1);

    orch.shutdown().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(signals.subscriber_count(), 0);

    // Signals after teardown reach nobody and change nothing.
    signals.raise(TerminationSignal::Terminate);
    assert_eq!(orch.state(), LifecycleState::Destroyed);
    assert_eq!(log.with_prefix("stop").len(), 1);
}

#[tokio::test]
async fn test_signal_before_run_is_ignored() {
    let log = EventLog::default();
    let (orch, signals) = orchestrator();
    orch.register(Arc::new(RecordingAdapter::new("svc", &log)));

    signals.raise(TerminationSignal::Terminate);
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(orch.state(), LifecycleState::Uninitialized);
    orch.run(&app()).await.unwrap();
    assert_eq!(orch.state(), LifecycleState::Started);
}

#[tokio::test]
async fn test_failed_run_releases_signal_subscription() {
    let log = EventLog::default();
    let (orch, signals) = orchestrator();
    orch.register_with(Arc::new(RecordingAdapter::new("svc", &log)), 0, ["missing"]);

    assert!(orch.run(&app()).await.is_err());
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(signals.subscriber_count(), 0);
}
