//! Grid stability model: input/result types and the analytic formula.

/// Analytic imbalance-to-stability model.
pub mod analytic;
pub mod error;
pub mod types;

use async_trait::async_trait;

pub use analytic::AnalyticModel;
pub use error::SimulationError;
pub use types::{SimulationInput, SimulationMode, SimulationResult, StabilityStatus};

/// A source of grid stability results.
///
/// Implemented by the local [`AnalyticModel`] and by
/// [`crate::engine::EngineModel`], which adapts an external engine.
#[async_trait]
pub trait GridModel: Send + Sync {
    /// Failure type of this model.
    type Error: std::error::Error + Send;

    /// Evaluates one validated input.
    async fn evaluate(&self, input: &SimulationInput) -> Result<SimulationResult, Self::Error>;
}
