//! Shared test fixtures: a loopback stub of the remote simulation engine.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};

use grid_sim::engine::types::{EngineRequest, RawEngineResult};

/// How the stub answers `/simulate`.
#[derive(Debug, Clone, Copy)]
pub enum StubBehavior {
    /// Valid STABLE result echoing the inputs.
    Healthy,
    /// HTTP 500.
    ServerError,
    /// 200 with a body that is not a result record.
    Garbage,
    /// Sleeps longer than any test timeout.
    Slow,
}

/// Counters recorded by the stub.
#[derive(Default)]
pub struct StubCounters {
    pub simulate_calls: AtomicUsize,
    pub shutdown_calls: AtomicUsize,
}

struct StubState {
    behavior: StubBehavior,
    counters: Arc<StubCounters>,
}

/// Warning text returned by the healthy stub, distinguishable from the analytic model.
pub const STUB_WARNING: &str = "stub engine result";

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn simulate(
    State(state): State<Arc<StubState>>,
    Json(req): Json<EngineRequest>,
) -> Response {
    state.counters.simulate_calls.fetch_add(1, Ordering::SeqCst);
    match state.behavior {
        StubBehavior::Healthy => Json(RawEngineResult {
            load_mw: req.load_mw,
            generation_mw: req.generation_mw,
            power_imbalance_mw: req.generation_mw - req.load_mw,
            system_frequency_hz: 60.0,
            frequency_deviation_hz: 0.0,
            voltage_pu: 1.0,
            stability_status: "STABLE".to_string(),
            stability_index: 1.0,
            efficiency_percent: 100.0,
            warning: STUB_WARNING.to_string(),
        })
        .into_response(),
        StubBehavior::ServerError => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        StubBehavior::Garbage => (StatusCode::OK, "{\"hello\": \"world\"}").into_response(),
        StubBehavior::Slow => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            StatusCode::OK.into_response()
        }
    }
}

async fn shutdown(State(state): State<Arc<StubState>>) -> StatusCode {
    state.counters.shutdown_calls.fetch_add(1, Ordering::SeqCst);
    StatusCode::OK
}

/// Starts a stub engine on an ephemeral loopback port.
///
/// Returns `(base_url, counters)`. The server runs until the test runtime ends.
pub async fn spawn_stub_engine(behavior: StubBehavior) -> (String, Arc<StubCounters>) {
    let counters = Arc::new(StubCounters::default());
    let state = Arc::new(StubState {
        behavior,
        counters: counters.clone(),
    });
    let app = Router::new()
        .route("/health", get(health))
        .route("/simulate", post(simulate))
        .route("/shutdown", post(shutdown))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("stub engine should bind");
    let addr = listener.local_addr().expect("stub engine should have an address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), counters)
}

/// Base URL of a loopback port with nothing listening.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("ephemeral listener should bind");
    let addr = listener.local_addr().expect("ephemeral listener should have an address");
    drop(listener);
    format!("http://{addr}")
}
