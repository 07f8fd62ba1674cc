//! Error handling for the EEG epoch/quality framework
//!
//! Configuration problems fail fast at construction. Data-quality outcomes
//! (an invalid epoch, a failing quality score) are ordinary values and never
//! travel through this type; it is reserved for genuinely broken inputs.

use thiserror::Error;

/// Result type alias for framework operations
pub type EegResult<T> = Result<T, EegError>;

/// Error type for all framework operations
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EegError {
    /// Invalid parameter supplied when constructing a component
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
    },

    /// Signal container invariants violated (ragged channels, bad names, ...)
    #[error("Invalid signal: {reason}")]
    InvalidSignal {
        /// Description of the violated invariant
        reason: String,
    },

    /// Wall-clock time could not be parsed
    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp {
        /// Offending input text
        value: String,
        /// Parser diagnostic
        reason: String,
    },

    /// Epoch data cannot be assessed at all
    #[error("Malformed epoch {epoch_id}: {reason}")]
    MalformedEpoch {
        /// Identifier of the offending epoch
        epoch_id: u64,
        /// Why the epoch was rejected
        reason: String,
    },

    /// A metric produced an unusable value
    #[error("Metric '{metric}' failed for epoch {epoch_id}: {reason}")]
    MetricComputation {
        /// Identifier of the epoch being scored
        epoch_id: u64,
        /// Metric name as it appears in the quality table
        metric: &'static str,
        /// Diagnostic
        reason: String,
    },

    /// The worker running an epoch's assessment died
    #[error("Worker for epoch {epoch_id} failed: {reason}")]
    WorkerFailed {
        /// Identifier of the epoch the worker was assessing
        epoch_id: u64,
        /// Panic or join diagnostic
        reason: String,
    },

    /// Fail-fast batch stopped at the first per-epoch failure
    #[error("Batch aborted at epoch {epoch_id}: {source}")]
    BatchAborted {
        /// Epoch whose failure stopped the batch
        epoch_id: u64,
        /// The underlying failure
        source: Box<EegError>,
    },

    /// Synthetic signal generation failed
    #[error("Simulation error: {message}")]
    Simulation {
        /// Description of the failure
        message: String,
    },

    /// In-memory JSON rendering failed
    #[error("Serialization error: {message}")]
    Serialization {
        /// Serializer diagnostic
        message: String,
    },
}

impl EegError {
    /// Epoch this error is attributed to, if any
    pub fn epoch_id(&self) -> Option<u64> {
        match self {
            EegError::MalformedEpoch { epoch_id, .. }
            | EegError::MetricComputation { epoch_id, .. }
            | EegError::WorkerFailed { epoch_id, .. }
            | EegError::BatchAborted { epoch_id, .. } => Some(*epoch_id),
            _ => None,
        }
    }

    /// True for errors raised while validating configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, EegError::Configuration { .. })
    }
}

/// Convenience macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::error::EegError::Configuration {
            message: format!($($arg)*),
        }
    };
}

/// Convenience macro for creating signal invariant errors
#[macro_export]
macro_rules! signal_error {
    ($($arg:tt)*) => {
        $crate::error::EegError::InvalidSignal {
            reason: format!($($arg)*),
        }
    };
}
