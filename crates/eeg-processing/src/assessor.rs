//! Per-epoch quality assessment
//!
//! The assessor runs every metric of its suite over an epoch and folds the
//! scores into a weighted overall quality. The pass/fail verdict is derived
//! from that overall quality and nothing else.

use crate::batch::{AssessmentOutcome, BatchOutcome};
use crate::config::QualityConfig;
use crate::metrics::{MetricKind, QualityMetricSuite};
use crate::report::{MetricScores, QualityReport};
use eeg_core::{EegError, EegResult, Epoch};
use tracing::{debug, warn};

/// Scores epochs against a fixed configuration
#[derive(Debug)]
pub struct QualityAssessor {
    config: QualityConfig,
    suite: QualityMetricSuite,
}

impl QualityAssessor {
    pub fn new(config: QualityConfig) -> EegResult<Self> {
        let suite = QualityMetricSuite::from_config(&config);
        Self::with_suite(config, suite)
    }

    /// Assessor with a custom metric suite
    pub fn with_suite(config: QualityConfig, suite: QualityMetricSuite) -> EegResult<Self> {
        config.validate()?;
        Ok(Self { config, suite })
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    pub fn suite(&self) -> &QualityMetricSuite {
        &self.suite
    }

    /// Score one epoch
    pub fn assess(&self, epoch: &Epoch) -> EegResult<QualityReport> {
        self.check_well_formed(epoch)?;

        let mut scores = MetricScores::default();
        for (kind, score) in self.suite.score_all(epoch.data()) {
            if !(score.is_finite() && (0.0..=1.0).contains(&score)) {
                return Err(EegError::MetricComputation {
                    epoch_id: epoch.epoch_id(),
                    metric: kind.name(),
                    reason: format!("score {} outside [0, 1]", score),
                });
            }
            scores.set(kind, score);
        }

        let overall = self.overall_quality(&scores);
        let report = QualityReport::new(epoch.epoch_id(), scores, overall, self.config.quality_threshold);

        debug!(
            "Epoch {} overall quality {:.3} (passes: {})",
            epoch.epoch_id(),
            report.overall_quality(),
            report.passes_threshold()
        );
        Ok(report)
    }

    /// Score epochs one after another; failures stay with their epoch
    pub fn assess_many(&self, epochs: &[Epoch]) -> BatchOutcome {
        let entries = epochs
            .iter()
            .map(|epoch| {
                let outcome = match self.assess(epoch) {
                    Ok(report) => AssessmentOutcome::Assessed(report),
                    Err(e) => {
                        warn!("Assessment failed for epoch {}: {}", epoch.epoch_id(), e);
                        AssessmentOutcome::Failed(e)
                    }
                };
                (epoch.epoch_id(), outcome)
            })
            .collect();

        BatchOutcome::new(entries)
    }

    /// Weighted mean of the metric scores, clamped to `[0, 1]`
    pub fn overall_quality(&self, scores: &MetricScores) -> f64 {
        let weights = &self.config.weights;
        let weighted: f64 = MetricKind::ALL
            .iter()
            .map(|&kind| weights.weight(kind) * scores.get(kind))
            .sum();
        (weighted / weights.total()).clamp(0.0, 1.0)
    }

    fn check_well_formed(&self, epoch: &Epoch) -> EegResult<()> {
        let rate = epoch.data().sampling_rate();
        if (rate - self.config.sampling_rate).abs() > f64::EPSILON * self.config.sampling_rate {
            return Err(EegError::MalformedEpoch {
                epoch_id: epoch.epoch_id(),
                reason: format!(
                    "sampled at {} Hz, assessor expects {} Hz",
                    rate, self.config.sampling_rate
                ),
            });
        }

        let infinite = epoch
            .data()
            .channels()
            .iter()
            .zip(epoch.data().channel_names())
            .find_map(|(samples, name)| samples.iter().position(|v| v.is_infinite()).map(|i| (name, i)));
        if let Some((name, index)) = infinite {
            return Err(EegError::MalformedEpoch {
                epoch_id: epoch.epoch_id(),
                reason: format!("channel '{}' holds an infinite sample at {}", name, index),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetricWeights;
    use crate::metrics::QualityMetric;
    use eeg_core::MultiChannelSignal;

    fn epoch(id: u64, channels: Vec<Vec<f64>>, rate: f64) -> Epoch {
        let names = (0..channels.len()).map(|i| format!("Ch{}", i + 1)).collect();
        Epoch::new(id, 0, MultiChannelSignal::from_channels(names, channels, rate).unwrap())
    }

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * 10.0 * i as f64 / 128.0).sin() + 0.3 * ((i * 7919) % 13) as f64 / 13.0)
            .collect()
    }

    fn assessor() -> QualityAssessor {
        QualityAssessor::new(QualityConfig::default()).unwrap()
    }

    struct Broken;

    impl QualityMetric for Broken {
        fn kind(&self) -> MetricKind {
            MetricKind::Sharpness
        }

        fn score(&self, _data: &MultiChannelSignal) -> f64 {
            f64::NAN
        }
    }

    #[test]
    fn test_clean_epoch_passes() {
        let report = assessor().assess(&epoch(3, vec![wave(512), wave(512)], 128.0)).unwrap();
        assert_eq!(report.epoch_id(), 3);
        assert_eq!(report.score(MetricKind::Nan), 1.0);
        assert!(report.overall_quality() > 0.9);
        assert!(report.passes_threshold());
    }

    #[test]
    fn test_overall_is_weighted_mean() {
        let config = QualityConfig {
            weights: MetricWeights {
                nan: 3.0,
                gap: 1.0,
                outlier: 0.0,
                flatline: 0.0,
                sharpness: 0.0,
                cohesion: 0.0,
            },
            ..QualityConfig::default()
        };
        let assessor = QualityAssessor::new(config).unwrap();
        let scores = MetricScores {
            nan_quality: 0.5,
            gap_quality: 1.0,
            ..MetricScores::default()
        };
        assert!((assessor.overall_quality(&scores) - 0.625).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_invariant() {
        let assessor = assessor();
        let mut samples = wave(512);
        samples[100..400].fill(f64::NAN);
        let fixtures = vec![
            epoch(0, vec![wave(512)], 128.0),
            epoch(1, vec![samples], 128.0),
            epoch(2, vec![vec![1.0; 512]], 128.0),
            epoch(3, vec![vec![f64::NAN; 512]], 128.0),
        ];

        for epoch in &fixtures {
            let report = assessor.assess(epoch).unwrap();
            assert_eq!(
                report.passes_threshold(),
                report.overall_quality() >= assessor.config().quality_threshold
            );
            assert!((0.0..=1.0).contains(&report.overall_quality()));
        }
    }

    #[test]
    fn test_malformed_epochs() {
        let assessor = assessor();

        let mut samples = wave(64);
        samples[10] = f64::INFINITY;
        let err = assessor.assess(&epoch(5, vec![samples], 128.0)).unwrap_err();
        assert!(matches!(err, EegError::MalformedEpoch { epoch_id: 5, .. }));

        let err = assessor.assess(&epoch(6, vec![wave(64)], 256.0)).unwrap_err();
        assert_eq!(err.epoch_id(), Some(6));
    }

    #[test]
    fn test_metric_failure_names_metric() {
        let config = QualityConfig::default();
        let suite = QualityMetricSuite::from_config(&config).with_metric(Box::new(Broken));
        let assessor = QualityAssessor::with_suite(config, suite).unwrap();

        match assessor.assess(&epoch(9, vec![wave(64)], 128.0)) {
            Err(EegError::MetricComputation { epoch_id, metric, .. }) => {
                assert_eq!(epoch_id, 9);
                assert_eq!(metric, "sharpness_quality");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_assess_many_isolates_failures() {
        let assessor = assessor();
        let mut bad = wave(64);
        bad[0] = f64::NEG_INFINITY;
        let epochs = vec![
            epoch(0, vec![wave(64)], 128.0),
            epoch(1, vec![bad], 128.0),
            epoch(2, vec![wave(64)], 128.0),
        ];

        let outcome = assessor.assess_many(&epochs);
        assert_eq!(outcome.epoch_ids(), vec![0, 1, 2]);
        assert_eq!(outcome.reports().len(), 2);
        assert_eq!(outcome.failure_count(), 1);
        assert_eq!(outcome.failures()[0].0, 1);
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_invalid_config() {
        let config = QualityConfig {
            quality_threshold: -0.5,
            ..QualityConfig::default()
        };
        assert!(QualityAssessor::new(config).unwrap_err().is_configuration());
    }
}
