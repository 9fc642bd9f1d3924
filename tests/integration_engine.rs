//! Remote engine client and selector against a loopback stub engine.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use grid_sim::engine::{
    EngineError, EngineState, ExternalEngine, RemoteEngine, SimulationSelector,
};
use grid_sim::grid::AnalyticModel;
use grid_sim::grid::types::{SimulationInput, SimulationMode};

use common::{STUB_WARNING, StubBehavior, closed_port_url, spawn_stub_engine};

const TIMEOUT: Duration = Duration::from_millis(500);

#[tokio::test]
async fn handshake_marks_engine_available() {
    let (url, _) = spawn_stub_engine(StubBehavior::Healthy).await;
    let engine = RemoteEngine::new(url, TIMEOUT).unwrap();
    assert_eq!(engine.state(), EngineState::Uninitialized);

    assert!(engine.initialize().await);
    assert_eq!(engine.state(), EngineState::Available);
    assert!(engine.is_available());
}

#[tokio::test]
async fn handshake_failure_marks_engine_unavailable() {
    let engine = RemoteEngine::new(closed_port_url().await, TIMEOUT).unwrap();
    assert!(!engine.initialize().await);
    assert_eq!(engine.state(), EngineState::Unavailable);
    assert_eq!(engine.invoke(1.0, 1.0).await, Err(EngineError::Unavailable));
}

#[tokio::test]
async fn invoke_returns_engine_record() {
    let (url, counters) = spawn_stub_engine(StubBehavior::Healthy).await;
    let engine = RemoteEngine::new(url, TIMEOUT).unwrap();
    engine.initialize().await;

    let raw = engine.invoke(400.0, 420.0).await.unwrap();
    assert_eq!(raw.power_imbalance_mw, 20.0);
    assert_eq!(raw.warning, STUB_WARNING);
    assert_eq!(counters.simulate_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn invoke_maps_http_errors() {
    let (url, _) = spawn_stub_engine(StubBehavior::ServerError).await;
    let engine = RemoteEngine::new(url, TIMEOUT).unwrap();
    engine.initialize().await;
    assert_eq!(engine.invoke(1.0, 1.0).await, Err(EngineError::Status(500)));
}

#[tokio::test]
async fn invoke_maps_undecodable_body() {
    let (url, _) = spawn_stub_engine(StubBehavior::Garbage).await;
    let engine = RemoteEngine::new(url, TIMEOUT).unwrap();
    engine.initialize().await;
    assert!(matches!(
        engine.invoke(1.0, 1.0).await,
        Err(EngineError::Malformed(_))
    ));
}

#[tokio::test]
async fn invoke_reports_slow_engine_as_timeout() {
    let (url, _) = spawn_stub_engine(StubBehavior::Slow).await;
    let short = Duration::from_millis(150);
    let engine = RemoteEngine::new(url, short).unwrap();
    engine.initialize().await;
    assert_eq!(engine.invoke(1.0, 1.0).await, Err(EngineError::Timeout(short)));
}

#[tokio::test]
async fn shutdown_notifies_engine_and_resets_state() {
    let (url, counters) = spawn_stub_engine(StubBehavior::Healthy).await;
    let engine = RemoteEngine::new(url, TIMEOUT).unwrap();
    engine.initialize().await;

    engine.shutdown().await;
    assert_eq!(engine.state(), EngineState::Uninitialized);
    assert_eq!(counters.shutdown_calls.load(Ordering::SeqCst), 1);

    // second shutdown is a no-op
    engine.shutdown().await;
    assert_eq!(counters.shutdown_calls.load(Ordering::SeqCst), 1);
}

async fn selector_for(behavior: StubBehavior) -> SimulationSelector {
    let (url, _) = spawn_stub_engine(behavior).await;
    let engine = Arc::new(RemoteEngine::new(url, TIMEOUT).unwrap());
    engine.initialize().await;
    SimulationSelector::with_engine(engine, Duration::from_millis(200))
}

#[tokio::test]
async fn selector_uses_healthy_remote_engine() {
    let selector = selector_for(StubBehavior::Healthy).await;
    let input = SimulationInput::new(700.0, 1000.0).unwrap();
    let r = selector.simulate(&input).await.unwrap();
    assert_eq!(r.simulation_mode, SimulationMode::Primary);
    assert_eq!(r.warning, STUB_WARNING);
}

#[tokio::test]
async fn selector_falls_back_on_every_failure_kind() {
    for behavior in [
        StubBehavior::ServerError,
        StubBehavior::Garbage,
        StubBehavior::Slow,
    ] {
        let selector = selector_for(behavior).await;
        let input = SimulationInput::new(700.0, 1000.0).unwrap();
        let r = selector.simulate(&input).await.unwrap();
        let expected = AnalyticModel.evaluate_now(700.0, 1000.0).unwrap();

        assert_eq!(r.simulation_mode, SimulationMode::Fallback, "{behavior:?}");
        assert_eq!(r.stability_status, expected.stability_status);
        assert_eq!(r.warning, expected.warning);
        assert_eq!(r.voltage_pu, expected.voltage_pu);
    }
}
