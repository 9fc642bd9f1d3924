//! External engine contracts: capability trait, lifecycle state, wire record.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of an external engine call. Always recovered by fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("engine is not available")]
    Unavailable,

    #[error("engine call timed out after {0:?}")]
    Timeout(Duration),

    #[error("engine transport error: {0}")]
    Transport(String),

    #[error("engine returned HTTP {0}")]
    Status(u16),

    #[error("malformed engine response: {0}")]
    Malformed(String),
}

/// Lifecycle of an engine session.
///
/// `Uninitialized → initialize → {Available, Unavailable}`;
/// `shutdown → Uninitialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EngineState {
    Uninitialized = 0,
    Available = 1,
    Unavailable = 2,
}

impl EngineState {
    /// Decodes the atomic representation; unknown values read as uninitialized.
    pub fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Available,
            2 => Self::Unavailable,
            _ => Self::Uninitialized,
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        };
        f.write_str(name)
    }
}

/// Result record as returned by an external engine, before normalization.
///
/// Carries no timestamp and no mode tag; [`super::EngineModel`] adds both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEngineResult {
    pub load_mw: f64,
    pub generation_mw: f64,
    pub power_imbalance_mw: f64,
    pub system_frequency_hz: f64,
    pub frequency_deviation_hz: f64,
    pub voltage_pu: f64,
    /// Expected to be `STABLE`, `WARNING` or `CRITICAL`.
    pub stability_status: String,
    pub stability_index: f64,
    pub efficiency_percent: f64,
    pub warning: String,
}

/// Request body sent to an external engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineRequest {
    pub load_mw: f64,
    pub generation_mw: f64,
}

/// Capability interface of a high-fidelity external engine.
///
/// The selector only ever calls [`is_available`](ExternalEngine::is_available)
/// and [`invoke`](ExternalEngine::invoke). `initialize` and `shutdown` belong
/// to the service bootstrap.
#[async_trait]
pub trait ExternalEngine: Send + Sync {
    /// Performs the handshake. Returns `true` if the engine is now available.
    async fn initialize(&self) -> bool;

    /// Current availability flag. Cheap; read on every request.
    fn is_available(&self) -> bool;

    /// Runs one simulation on the engine.
    async fn invoke(
        &self,
        load_mw: f64,
        generation_mw: f64,
    ) -> Result<RawEngineResult, EngineError>;

    /// Ends the session. No-op if never initialized.
    async fn shutdown(&self);

    /// Short name used in logs.
    fn name(&self) -> &str {
        "external"
    }
}
