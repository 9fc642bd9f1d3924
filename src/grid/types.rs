//! Core grid types: simulation input, result record, and classification enums.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::SimulationError;

/// Default sanity ceiling for load and generation inputs (MW).
pub const DEFAULT_MAX_MW: f64 = 100_000.0;

/// Validated simulation input.
///
/// Both values are finite, non-negative and below the configured ceiling.
/// Construct with [`SimulationInput::new`] or
/// [`SimulationInput::with_ceiling`]; fields are read-only afterwards.
///
/// # Examples
///
/// ```
/// use grid_sim::grid::types::SimulationInput;
///
/// let input = SimulationInput::new(900.0, 1000.0).unwrap();
/// assert_eq!(input.load_mw(), 900.0);
/// assert!(SimulationInput::new(-1.0, 1000.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationInput {
    load_mw: f64,
    generation_mw: f64,
}

impl SimulationInput {
    /// Creates an input checked against [`DEFAULT_MAX_MW`].
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidInput`] if either value is negative,
    /// non-finite, or above the ceiling.
    pub fn new(load_mw: f64, generation_mw: f64) -> Result<Self, SimulationError> {
        Self::with_ceiling(load_mw, generation_mw, DEFAULT_MAX_MW)
    }

    /// Creates an input checked against an explicit ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidInput`] if either value is negative,
    /// non-finite, or above `max_mw`.
    pub fn with_ceiling(
        load_mw: f64,
        generation_mw: f64,
        max_mw: f64,
    ) -> Result<Self, SimulationError> {
        check_quantity("load_mw", load_mw, max_mw)?;
        check_quantity("generation_mw", generation_mw, max_mw)?;
        Ok(Self {
            load_mw,
            generation_mw,
        })
    }

    /// System load (MW).
    pub fn load_mw(&self) -> f64 {
        self.load_mw
    }

    /// System generation (MW).
    pub fn generation_mw(&self) -> f64 {
        self.generation_mw
    }
}

fn check_quantity(field: &str, value: f64, max_mw: f64) -> Result<(), SimulationError> {
    if !value.is_finite() {
        return Err(SimulationError::InvalidInput(format!(
            "{field} must be a finite number"
        )));
    }
    if value < 0.0 {
        return Err(SimulationError::InvalidInput(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > max_mw {
        return Err(SimulationError::InvalidInput(format!(
            "{field} exceeds reasonable limit ({max_mw} MW), got {value}"
        )));
    }
    Ok(())
}

/// Stability classification derived from the absolute power imbalance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StabilityStatus {
    Stable,
    Warning,
    Critical,
}

impl StabilityStatus {
    /// Stability index associated with each class: 1.0, 0.5 or 0.0.
    pub fn index(self) -> f64 {
        match self {
            Self::Stable => 1.0,
            Self::Warning => 0.5,
            Self::Critical => 0.0,
        }
    }

    /// Wire name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "STABLE",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for StabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SimulationMode {
    /// Computed by the external engine.
    Primary,
    /// Computed by the local analytic model.
    Fallback,
}

/// Result of one grid stability evaluation.
///
/// Field names are the public JSON contract of `POST /api/simulate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Evaluation instant, RFC 3339.
    pub timestamp: String,
    /// System load (MW).
    pub load_mw: f64,
    /// System generation (MW).
    pub generation_mw: f64,
    /// `generation_mw - load_mw`; positive means surplus generation.
    pub power_imbalance_mw: f64,
    /// Resulting system frequency (Hz).
    pub system_frequency_hz: f64,
    /// Deviation from nominal frequency (Hz).
    pub frequency_deviation_hz: f64,
    /// Bus voltage in per-unit, clamped to [0.85, 1.15].
    pub voltage_pu: f64,
    /// Stability class.
    pub stability_status: StabilityStatus,
    /// 1.0, 0.5 or 0.0 depending on `stability_status`.
    pub stability_index: f64,
    /// `load / generation * 100`, capped at 100; 0 with no generation.
    pub efficiency_percent: f64,
    /// Operator-facing message for the stability class.
    pub warning: String,
    /// Path that produced this result.
    pub simulation_mode: SimulationMode,
}

impl SimulationResult {
    /// Checks the documented range invariants of a result.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), String> {
        let numeric = [
            ("load_mw", self.load_mw),
            ("generation_mw", self.generation_mw),
            ("power_imbalance_mw", self.power_imbalance_mw),
            ("system_frequency_hz", self.system_frequency_hz),
            ("frequency_deviation_hz", self.frequency_deviation_hz),
            ("voltage_pu", self.voltage_pu),
            ("stability_index", self.stability_index),
            ("efficiency_percent", self.efficiency_percent),
        ];
        if let Some((name, _)) = numeric.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{name} is not finite"));
        }
        if !(0.85..=1.15).contains(&self.voltage_pu) {
            return Err(format!("voltage_pu {} outside [0.85, 1.15]", self.voltage_pu));
        }
        if self.stability_index != self.stability_status.index() {
            return Err(format!(
                "stability_index {} does not match status {}",
                self.stability_index, self.stability_status
            ));
        }
        if !(0.0..=100.0).contains(&self.efficiency_percent) {
            return Err(format!(
                "efficiency_percent {} outside [0, 100]",
                self.efficiency_percent
            ));
        }
        Ok(())
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "load={:.2} MW  gen={:.2} MW | imbalance={:>8.2} MW | f={:.4} Hz (Δ{:+.4}) \
             V={:.4} pu | {} (idx={:.1}) eff={:.1}% [{:?}]",
            self.load_mw,
            self.generation_mw,
            self.power_imbalance_mw,
            self.system_frequency_hz,
            self.frequency_deviation_hz,
            self.voltage_pu,
            self.stability_status,
            self.stability_index,
            self.efficiency_percent,
            self.simulation_mode,
        )
    }
}
