//! EEG-Core: Foundation types for epoch extraction and quality assessment
//!
//! Signals, epochs, wall-clock stamping and the shared error type.

pub mod error;
pub mod signal;
pub mod timestamp;
pub mod metadata;
pub mod epoch;

pub use error::{EegError, EegResult};
pub use signal::*;
pub use timestamp::TimeIndexer;
pub use metadata::RecordingMetadata;
pub use epoch::*;

pub use chrono::NaiveTime;
