//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use grid_sim::api::{AppState, router};
use grid_sim::engine::{ExternalEngine, RemoteEngine, SimulationSelector};

use common::{STUB_WARNING, StubBehavior, spawn_stub_engine};

fn analytic_state() -> Arc<AppState> {
    Arc::new(AppState::new(SimulationSelector::analytic_only(), 100_000.0))
}

fn post_simulate(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/simulate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_of(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn warning_scenario() {
    let app = router(analytic_state());
    let resp = app
        .oneshot(post_simulate(r#"{"load_mw": 900, "generation_mw": 1000}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = json_of(resp).await;
    assert_eq!(json["power_imbalance_mw"], 100.0);
    assert_eq!(json["stability_status"], "WARNING");
    assert_eq!(json["stability_index"], 0.5);
    assert_eq!(
        json["warning"],
        "WARNING: Power imbalance detected. System approaching instability."
    );
    let efficiency = json["efficiency_percent"].as_f64().unwrap();
    assert!((efficiency - 90.0).abs() < 1e-9);
}

#[tokio::test]
async fn critical_scenario() {
    let app = router(analytic_state());
    let resp = app
        .oneshot(post_simulate(r#"{"load_mw": 700, "generation_mw": 1000}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = json_of(resp).await;
    assert_eq!(json["stability_status"], "CRITICAL");
    assert_eq!(json["stability_index"], 0.0);
    assert_eq!(
        json["warning"],
        "CRITICAL: Excess generation detected. Reduce generation or increase load."
    );
    assert_eq!(json["simulation_mode"], "FALLBACK");
}

#[tokio::test]
async fn result_has_full_field_set() {
    let app = router(analytic_state());
    let resp = app
        .oneshot(post_simulate(r#"{"load_mw": 10.5, "generation_mw": 0}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = json_of(resp).await;
    for key in [
        "timestamp",
        "load_mw",
        "generation_mw",
        "power_imbalance_mw",
        "system_frequency_hz",
        "frequency_deviation_hz",
        "voltage_pu",
        "stability_status",
        "stability_index",
        "efficiency_percent",
        "warning",
        "simulation_mode",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["efficiency_percent"], 0.0);
}

#[tokio::test]
async fn malformed_bodies_return_400() {
    for body in [
        "not json",
        r#"{"load_mw": 10}"#,
        r#"{"load_mw": null, "generation_mw": 5}"#,
        r#"{"load_mw": "10", "generation_mw": 5}"#,
    ] {
        let app = router(analytic_state());
        let resp = app.oneshot(post_simulate(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let json = json_of(resp).await;
        assert_eq!(json["status_code"], 400);
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn configured_ceiling_is_enforced() {
    let state = Arc::new(AppState::new(SimulationSelector::analytic_only(), 500.0));
    let app = router(state);
    let resp = app
        .oneshot(post_simulate(r#"{"load_mw": 501, "generation_mw": 10}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let app = router(analytic_state());
    let req = Request::builder()
        .uri("/api/simulate")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn remote_engine_drives_health_and_primary_results() {
    let (url, _) = spawn_stub_engine(StubBehavior::Healthy).await;
    let engine = Arc::new(RemoteEngine::new(url, Duration::from_millis(500)).unwrap());
    assert!(engine.initialize().await);
    let selector = SimulationSelector::with_engine(engine.clone(), Duration::from_millis(500));
    let state = Arc::new(AppState::new(selector, 100_000.0));

    let health = router(state.clone())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = json_of(health).await;
    assert_eq!(json["matlab_available"], true);
    assert_eq!(json["simulation_mode"], "MATLAB");

    let resp = router(state.clone())
        .oneshot(post_simulate(r#"{"load_mw": 100, "generation_mw": 100}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = json_of(resp).await;
    assert_eq!(json["simulation_mode"], "PRIMARY");
    assert_eq!(json["warning"], STUB_WARNING);

    engine.shutdown().await;
    let status = router(state)
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = json_of(status).await;
    assert_eq!(json["matlab_engine"]["available"], false);
    assert_eq!(json["matlab_engine"]["mode"], "PYTHON_FALLBACK");
}
