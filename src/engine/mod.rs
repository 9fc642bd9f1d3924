//! External engine integration and primary/fallback selection.

pub mod model;
/// HTTP client for a remote simulation engine.
pub mod remote;
pub mod selector;
pub mod types;

pub use model::EngineModel;
pub use remote::RemoteEngine;
pub use selector::{DEFAULT_ENGINE_TIMEOUT, SimulationSelector};
pub use types::{EngineError, EngineState, ExternalEngine, RawEngineResult};
