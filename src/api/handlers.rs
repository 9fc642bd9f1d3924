//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::info;

use super::AppState;
use super::error::ApiError;
use super::types::{
    API_VERSION, ApiInfo, BackendMode, EngineStatus, HealthResponse, SimulateRequest,
    StatusResponse,
};
use crate::grid::types::{SimulationInput, SimulationResult};

/// Static API description.
///
/// `GET /` → 200 + `ApiInfo` JSON
pub async fn get_root() -> Json<ApiInfo> {
    Json(ApiInfo::describe())
}

/// Liveness plus engine availability.
///
/// `GET /health` → always 200 + `HealthResponse` JSON
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let available = state.selector.engine_available();
    Json(HealthResponse {
        status: "healthy",
        matlab_available: available,
        simulation_mode: BackendMode::from_availability(available),
    })
}

/// Nested server and engine status.
///
/// `GET /api/status` → 200 + `StatusResponse` JSON
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let available = state.selector.engine_available();
    Json(StatusResponse {
        server: "running",
        matlab_engine: EngineStatus {
            available,
            mode: BackendMode::from_availability(available),
        },
        api_version: API_VERSION,
    })
}

/// Runs one grid simulation.
///
/// `POST /api/simulate` → 200 + `SimulationResult` JSON
/// invalid or unparsable body → 400 + `{error, status_code}`
/// unexpected failure → 500 + `{error, detail}`
pub async fn post_simulate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Json<SimulationResult>, ApiError> {
    let Json(request) = body?;
    let input =
        SimulationInput::with_ceiling(request.load_mw, request.generation_mw, state.max_mw)?;

    info!(
        load_mw = input.load_mw(),
        generation_mw = input.generation_mw(),
        "running simulation"
    );
    let result = state.selector.simulate(&input).await?;
    info!(
        status = %result.stability_status,
        mode = ?result.simulation_mode,
        "simulation completed"
    );

    Ok(Json(result))
}
