//! Structural epoch checks run before quality assessment

use crate::config::ValidationConfig;
use eeg_core::{Epoch, EpochTable, EegResult};
use serde::Serialize;
use tracing::{debug, warn};

/// Outcome of validating one epoch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub reason: String,
}

impl ValidationVerdict {
    fn valid() -> Self {
        Self {
            is_valid: true,
            reason: "valid".to_string(),
        }
    }

    fn invalid(reason: String) -> Self {
        Self { is_valid: false, reason }
    }

    pub fn into_parts(self) -> (bool, String) {
        (self.is_valid, self.reason)
    }
}

/// An epoch excluded from assessment, with the reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedEpoch {
    pub epoch_id: u64,
    pub start_offset: usize,
    pub verdict: ValidationVerdict,
}

/// Cheap structural validation: non-empty and mostly present
#[derive(Debug, Clone)]
pub struct EpochValidator {
    config: ValidationConfig,
}

impl EpochValidator {
    pub fn new(config: ValidationConfig) -> EegResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Check one epoch without modifying it
    pub fn validate(&self, epoch: &Epoch) -> ValidationVerdict {
        let data = epoch.data();
        if data.channel_count() == 0 {
            return ValidationVerdict::invalid("empty epoch: no channels".to_string());
        }
        if data.len() == 0 {
            return ValidationVerdict::invalid("empty epoch: no samples".to_string());
        }

        let cells = data.cell_count();
        let present = cells - data.missing_count();
        let fraction = present as f64 / cells as f64;

        if fraction >= self.config.min_valid_ratio {
            ValidationVerdict::valid()
        } else {
            ValidationVerdict::invalid(format!(
                "insufficient valid data: {:.1}% < threshold {:.1}%",
                fraction * 100.0,
                self.config.min_valid_ratio * 100.0
            ))
        }
    }

    /// Split a table into epochs worth assessing and rejected ones
    pub fn partition(&self, table: &EpochTable) -> (Vec<Epoch>, Vec<RejectedEpoch>) {
        let mut accepted = Vec::with_capacity(table.len());
        let mut rejected = Vec::new();

        for epoch in table {
            let verdict = self.validate(epoch);
            if verdict.is_valid {
                accepted.push(epoch.clone());
            } else {
                warn!("Epoch {} rejected: {}", epoch.epoch_id(), verdict.reason);
                rejected.push(RejectedEpoch {
                    epoch_id: epoch.epoch_id(),
                    start_offset: epoch.start_offset(),
                    verdict,
                });
            }
        }

        debug!("Validated {} epochs, {} rejected", table.len(), rejected.len());
        (accepted, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eeg_core::MultiChannelSignal;

    fn epoch(channels: Vec<Vec<f64>>) -> Epoch {
        let names = (0..channels.len()).map(|i| format!("Ch{}", i + 1)).collect();
        Epoch::new(0, 0, MultiChannelSignal::from_channels(names, channels, 128.0).unwrap())
    }

    fn validator() -> EpochValidator {
        EpochValidator::new(ValidationConfig::default()).unwrap()
    }

    #[test]
    fn test_valid_epoch() {
        let (is_valid, reason) = validator().validate(&epoch(vec![vec![1.0; 10]])).into_parts();
        assert!(is_valid);
        assert_eq!(reason, "valid");
    }

    #[test]
    fn test_empty_epochs() {
        let verdict = validator().validate(&epoch(vec![]));
        assert!(!verdict.is_valid);
        assert!(verdict.reason.starts_with("empty epoch"));

        let verdict = validator().validate(&epoch(vec![vec![], vec![]]));
        assert!(!verdict.is_valid);
        assert!(verdict.reason.contains("empty"));
    }

    #[test]
    fn test_insufficient_data() {
        let mut samples = vec![1.0; 10];
        samples[..6].fill(f64::NAN);
        let verdict = validator().validate(&epoch(vec![samples]));

        assert!(!verdict.is_valid);
        assert_eq!(verdict.reason, "insufficient valid data: 40.0% < threshold 50.0%");
    }

    #[test]
    fn test_boundary_ratio_is_valid() {
        let mut samples = vec![1.0; 10];
        samples[..5].fill(f64::NAN);
        assert!(validator().validate(&epoch(vec![samples])).is_valid);

        let strict = EpochValidator::new(ValidationConfig { min_valid_ratio: 1.0 }).unwrap();
        let mut samples = vec![1.0; 10];
        samples[3] = f64::NAN;
        assert!(!strict.validate(&epoch(vec![samples])).is_valid);
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        assert!(EpochValidator::new(ValidationConfig { min_valid_ratio: 1.5 }).is_err());
        assert!(EpochValidator::new(ValidationConfig { min_valid_ratio: -0.1 }).is_err());
    }

    #[test]
    fn test_partition() {
        let parent = MultiChannelSignal::from_channels(
            vec!["Cz".to_string()],
            vec![vec![1.0, 2.0, f64::NAN, f64::NAN, 5.0, 6.0]],
            128.0,
        )
        .unwrap();
        let table = EpochTable::new(
            vec!["Cz".to_string()],
            vec![
                Epoch::new(0, 0, parent.slice(0, 2)),
                Epoch::new(1, 2, parent.slice(2, 4)),
                Epoch::new(2, 4, parent.slice(4, 6)),
            ],
        );

        let (accepted, rejected) = validator().partition(&table);
        assert_eq!(accepted.iter().map(|e| e.epoch_id()).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].epoch_id, 1);
        assert_eq!(rejected[0].start_offset, 2);
    }
}
