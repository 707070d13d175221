//! Weather station simulator
//!
//! Library side of the `weatherstation-sim` binary.

pub mod simulator;

pub use simulator::{RunOutcome, Simulator, SimulatorError, WaveConfig, build_payload};
