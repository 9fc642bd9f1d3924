//! Power grid stability simulator.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
/// External engine capability, remote client and primary/fallback selector.
pub mod engine;
/// Grid stability model and its input/result types.
pub mod grid;
pub mod telemetry;
