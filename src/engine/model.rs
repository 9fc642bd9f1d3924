//! Adapter exposing an [`ExternalEngine`] as a [`GridModel`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use crate::grid::GridModel;
use crate::grid::types::{SimulationInput, SimulationMode, SimulationResult, StabilityStatus};

use super::types::{EngineError, ExternalEngine, RawEngineResult};

/// Engine-backed model with a bounded call time.
///
/// Successful results are normalized and tagged [`SimulationMode::Primary`].
#[derive(Clone)]
pub struct EngineModel {
    engine: Arc<dyn ExternalEngine>,
    timeout: Duration,
}

impl EngineModel {
    /// Wraps `engine`; each call is cut off after `timeout`.
    pub fn new(engine: Arc<dyn ExternalEngine>, timeout: Duration) -> Self {
        Self { engine, timeout }
    }

    /// Availability flag of the wrapped engine.
    pub fn is_available(&self) -> bool {
        self.engine.is_available()
    }

    /// Engine name for logs.
    pub fn name(&self) -> &str {
        self.engine.name()
    }

    /// Per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl GridModel for EngineModel {
    type Error = EngineError;

    async fn evaluate(&self, input: &SimulationInput) -> Result<SimulationResult, Self::Error> {
        if !self.engine.is_available() {
            return Err(EngineError::Unavailable);
        }
        let call = self.engine.invoke(input.load_mw(), input.generation_mw());
        let raw = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| EngineError::Timeout(self.timeout))??;
        normalize(raw, input)
    }
}

/// Converts a raw engine record into a checked, timestamped result.
///
/// # Errors
///
/// Returns [`EngineError::Malformed`] for an unknown status, a record whose
/// inputs differ from `input`, or a record that violates the result
/// invariants.
pub fn normalize(
    raw: RawEngineResult,
    input: &SimulationInput,
) -> Result<SimulationResult, EngineError> {
    if raw.load_mw != input.load_mw() || raw.generation_mw != input.generation_mw() {
        return Err(EngineError::Malformed(format!(
            "engine answered for load_mw={}, generation_mw={}; requested {}, {}",
            raw.load_mw,
            raw.generation_mw,
            input.load_mw(),
            input.generation_mw()
        )));
    }

    let status = match raw.stability_status.trim().to_ascii_uppercase().as_str() {
        "STABLE" => StabilityStatus::Stable,
        "WARNING" => StabilityStatus::Warning,
        "CRITICAL" => StabilityStatus::Critical,
        other => {
            return Err(EngineError::Malformed(format!(
                "unknown stability_status \"{other}\""
            )));
        }
    };

    let result = SimulationResult {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        load_mw: raw.load_mw,
        generation_mw: raw.generation_mw,
        power_imbalance_mw: raw.power_imbalance_mw,
        system_frequency_hz: raw.system_frequency_hz,
        frequency_deviation_hz: raw.frequency_deviation_hz,
        voltage_pu: raw.voltage_pu,
        stability_status: status,
        stability_index: raw.stability_index,
        efficiency_percent: raw.efficiency_percent,
        warning: raw.warning,
        simulation_mode: SimulationMode::Primary,
    };
    result.check_invariants().map_err(EngineError::Malformed)?;
    Ok(result)
}
