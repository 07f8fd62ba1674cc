//! EEG-Simulation: synthetic EEG recordings with controllable artifacts
//!
//! Provides reproducible multi-channel signals for testing and development.

pub mod artifacts;
pub mod eeg_simulator;
pub mod signal_patterns;

pub use artifacts::*;
pub use eeg_simulator::*;
pub use signal_patterns::*;
