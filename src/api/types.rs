//! API request and response types.
//!
//! The health and status payloads keep the field names and mode strings
//! existing dashboards already parse.

use serde::{Deserialize, Serialize};

/// API version reported by `/` and `/api/status`.
pub const API_VERSION: &str = "1.0.0";

/// Body of `POST /api/simulate`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulateRequest {
    /// System load (MW).
    pub load_mw: f64,
    /// System generation (MW).
    pub generation_mw: f64,
}

/// Backend label reported by the status endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BackendMode {
    #[serde(rename = "MATLAB")]
    Engine,
    #[serde(rename = "PYTHON_FALLBACK")]
    Analytic,
}

impl BackendMode {
    pub fn from_availability(engine_available: bool) -> Self {
        if engine_available {
            Self::Engine
        } else {
            Self::Analytic
        }
    }
}

/// `GET /health` response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub matlab_available: bool,
    pub simulation_mode: BackendMode,
}

/// Engine section of `GET /api/status`.
#[derive(Debug, Serialize)]
pub struct EngineStatus {
    pub available: bool,
    pub mode: BackendMode,
}

/// `GET /api/status` response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub server: &'static str,
    pub matlab_engine: EngineStatus,
    pub api_version: &'static str,
}

/// Route table advertised by `GET /`.
#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub status: &'static str,
    pub simulate: &'static str,
}

/// `GET /` response.
#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

impl ApiInfo {
    pub fn describe() -> Self {
        Self {
            message: "Power Grid Simulation API",
            version: API_VERSION,
            endpoints: Endpoints {
                health: "/health",
                status: "/api/status",
                simulate: "/api/simulate",
            },
        }
    }
}

/// Error body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ClientErrorBody {
    /// Human-readable error message.
    pub error: String,
    /// Numeric HTTP status.
    pub status_code: u16,
}

/// Error body for 500-class errors.
#[derive(Debug, Serialize)]
pub struct ServerErrorBody {
    pub error: String,
    pub detail: String,
}
