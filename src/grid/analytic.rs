//! Built-in analytic grid model.
//!
//! Maps a generation/load imbalance to frequency and voltage deviation,
//! a stability class and an efficiency figure using fixed linear
//! sensitivities. Deterministic apart from the timestamp.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

use super::GridModel;
use super::error::SimulationError;
use super::types::{SimulationInput, SimulationMode, SimulationResult, StabilityStatus};

/// Nominal system frequency (Hz).
pub const NOMINAL_FREQUENCY_HZ: f64 = 60.0;
/// Frequency change per MW of imbalance (Hz/MW).
pub const FREQUENCY_SENSITIVITY: f64 = 0.0001;
/// Largest absolute imbalance still considered stable (MW).
pub const STABILITY_THRESHOLD_MW: f64 = 50.0;
/// Voltage at zero imbalance (pu).
pub const VOLTAGE_BASE_PU: f64 = 1.0;
/// Voltage change per MW of imbalance (pu/MW).
pub const VOLTAGE_SENSITIVITY: f64 = 0.00005;
/// Lower voltage clamp (pu).
pub const VOLTAGE_MIN_PU: f64 = 0.85;
/// Upper voltage clamp (pu).
pub const VOLTAGE_MAX_PU: f64 = 1.15;

/// Warning for CRITICAL with generation above load.
pub const MSG_EXCESS_GENERATION: &str =
    "CRITICAL: Excess generation detected. Reduce generation or increase load.";
/// Warning for CRITICAL with load above generation.
pub const MSG_LOAD_EXCEEDS_GENERATION: &str =
    "CRITICAL: Load exceeds generation. Increase generation or shed load.";
/// Warning for WARNING status.
pub const MSG_IMBALANCE_WARNING: &str =
    "WARNING: Power imbalance detected. System approaching instability.";
/// Warning for STABLE status.
pub const MSG_NORMAL: &str = "System operating within normal parameters.";

/// Local implementation of the grid stability formula.
///
/// Results are always tagged [`SimulationMode::Fallback`].
///
/// # Examples
///
/// ```
/// use grid_sim::grid::analytic::AnalyticModel;
/// use grid_sim::grid::types::StabilityStatus;
///
/// let result = AnalyticModel.evaluate_now(1000.0, 1000.0).unwrap();
/// assert_eq!(result.stability_status, StabilityStatus::Stable);
/// assert_eq!(result.system_frequency_hz, 60.0);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticModel;

impl AnalyticModel {
    /// Evaluates the model at a given instant.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidInput`] if either value is negative
    /// or not finite. No result is built in that case.
    pub fn evaluate_at(
        &self,
        load_mw: f64,
        generation_mw: f64,
        at: DateTime<Utc>,
    ) -> Result<SimulationResult, SimulationError> {
        if !load_mw.is_finite() || !generation_mw.is_finite() {
            return Err(SimulationError::InvalidInput(
                "load and generation must be finite".to_string(),
            ));
        }
        if load_mw < 0.0 || generation_mw < 0.0 {
            return Err(SimulationError::InvalidInput(
                "load and generation must be non-negative".to_string(),
            ));
        }

        let power_imbalance = generation_mw - load_mw;

        let frequency_deviation = power_imbalance * FREQUENCY_SENSITIVITY;
        let system_frequency = NOMINAL_FREQUENCY_HZ + frequency_deviation;

        let voltage_pu = (VOLTAGE_BASE_PU + power_imbalance * VOLTAGE_SENSITIVITY)
            .clamp(VOLTAGE_MIN_PU, VOLTAGE_MAX_PU);

        let status = classify(power_imbalance);

        let efficiency = if generation_mw > 0.0 {
            (load_mw / generation_mw * 100.0).min(100.0)
        } else {
            0.0
        };

        Ok(SimulationResult {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Micros, true),
            load_mw,
            generation_mw,
            power_imbalance_mw: power_imbalance,
            system_frequency_hz: system_frequency,
            frequency_deviation_hz: frequency_deviation,
            voltage_pu,
            stability_status: status,
            stability_index: status.index(),
            efficiency_percent: efficiency,
            warning: warning_for(status, power_imbalance).to_string(),
            simulation_mode: SimulationMode::Fallback,
        })
    }

    /// Evaluates the model at the current system time.
    ///
    /// # Errors
    ///
    /// See [`AnalyticModel::evaluate_at`].
    pub fn evaluate_now(
        &self,
        load_mw: f64,
        generation_mw: f64,
    ) -> Result<SimulationResult, SimulationError> {
        self.evaluate_at(load_mw, generation_mw, Utc::now())
    }
}

#[async_trait]
impl GridModel for AnalyticModel {
    type Error = SimulationError;

    async fn evaluate(&self, input: &SimulationInput) -> Result<SimulationResult, Self::Error> {
        self.evaluate_now(input.load_mw(), input.generation_mw())
    }
}

/// Classifies an imbalance: `<= 50` stable, `<= 100` warning, else critical.
pub fn classify(power_imbalance_mw: f64) -> StabilityStatus {
    let magnitude = power_imbalance_mw.abs();
    if magnitude <= STABILITY_THRESHOLD_MW {
        StabilityStatus::Stable
    } else if magnitude <= STABILITY_THRESHOLD_MW * 2.0 {
        StabilityStatus::Warning
    } else {
        StabilityStatus::Critical
    }
}

/// Operator message for a stability class and imbalance sign.
pub fn warning_for(status: StabilityStatus, power_imbalance_mw: f64) -> &'static str {
    match status {
        StabilityStatus::Critical if power_imbalance_mw > 0.0 => MSG_EXCESS_GENERATION,
        StabilityStatus::Critical => MSG_LOAD_EXCEEDS_GENERATION,
        StabilityStatus::Warning => MSG_IMBALANCE_WARNING,
        StabilityStatus::Stable => MSG_NORMAL,
    }
}
