//! Primary/fallback selection between an external engine and the analytic model.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::grid::types::{SimulationInput, SimulationResult};
use crate::grid::{AnalyticModel, GridModel, SimulationError};

use super::model::EngineModel;
use super::types::ExternalEngine;

/// Default bound on a single external engine call.
pub const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_secs(5);

/// Routes each simulation to the external engine when it is available and
/// to the analytic model otherwise.
///
/// The engine is injected at construction; its lifecycle belongs to the
/// caller. A failed engine call falls back immediately, without retry.
#[derive(Clone, Default)]
pub struct SimulationSelector {
    primary: Option<EngineModel>,
    fallback: AnalyticModel,
}

impl SimulationSelector {
    /// Selector with no external engine; every call uses the analytic model.
    pub fn analytic_only() -> Self {
        Self::default()
    }

    /// Selector backed by `engine`, each call bounded by `timeout`.
    pub fn with_engine(engine: Arc<dyn ExternalEngine>, timeout: Duration) -> Self {
        Self {
            primary: Some(EngineModel::new(engine, timeout)),
            fallback: AnalyticModel,
        }
    }

    /// Whether the next call would be tried on the external engine.
    pub fn engine_available(&self) -> bool {
        self.primary.as_ref().is_some_and(EngineModel::is_available)
    }

    /// Runs one simulation.
    ///
    /// Engine failures of any kind are logged and absorbed; the analytic
    /// result is returned in their place.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidInput`] from the analytic model, or
    /// [`SimulationError::Internal`] if its output breaks the result
    /// invariants.
    pub async fn simulate(
        &self,
        input: &SimulationInput,
    ) -> Result<SimulationResult, SimulationError> {
        if let Some(primary) = self.primary.as_ref().filter(|p| p.is_available()) {
            match primary.evaluate(input).await {
                Ok(result) => {
                    debug!(engine = primary.name(), "engine simulation succeeded");
                    return Ok(result);
                }
                Err(err) => {
                    warn!(
                        engine = primary.name(),
                        error = %err,
                        load_mw = input.load_mw(),
                        generation_mw = input.generation_mw(),
                        "engine simulation failed, falling back to analytic model"
                    );
                }
            }
        }

        let result = self.fallback.evaluate(input).await?;
        result.check_invariants().map_err(SimulationError::Internal)?;
        Ok(result)
    }
}
