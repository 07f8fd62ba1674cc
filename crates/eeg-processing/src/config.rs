//! Configuration management for epoch extraction and quality assessment
//!
//! Every section is a plain serde struct with defaults. Validation happens
//! once, when a component is constructed; invalid values are rejected with a
//! configuration error rather than clamped.

use crate::metrics::{MetricKind, SpreadMeasure};
use eeg_core::{config_error, EegError, EegResult};
use serde::{Deserialize, Serialize};

/// What to do with a trailing window shorter than the nominal epoch length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TailPolicy {
    /// Keep a partial window holding at least half an epoch
    #[default]
    KeepIfAtLeastHalf,
    /// Only full-length epochs are produced
    DropPartial,
    /// Every partial window becomes a truncated epoch
    KeepAll,
}

impl TailPolicy {
    /// Whether a partial window of `len` samples survives
    pub fn keeps(&self, len: usize, samples_per_epoch: usize) -> bool {
        match self {
            TailPolicy::KeepIfAtLeastHalf => 2 * len >= samples_per_epoch,
            TailPolicy::DropPartial => false,
            TailPolicy::KeepAll => len > 0,
        }
    }
}

/// Windowing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpochConfig {
    /// Epoch length in seconds
    pub epoch_length: f64,
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Fractional overlap between consecutive epochs, in `[0, 1)`
    pub overlap: f64,
    pub tail_policy: TailPolicy,
}

impl Default for EpochConfig {
    fn default() -> Self {
        Self {
            epoch_length: 300.0,
            sampling_rate: 128.0,
            overlap: 0.0,
            tail_policy: TailPolicy::default(),
        }
    }
}

impl EpochConfig {
    /// Nominal samples per epoch
    pub fn samples_per_epoch(&self) -> usize {
        (self.epoch_length * self.sampling_rate).round() as usize
    }

    /// Samples between consecutive epoch starts
    pub fn step(&self) -> usize {
        ((self.samples_per_epoch() as f64 * (1.0 - self.overlap)).round() as usize).max(1)
    }

    pub fn validate(&self) -> EegResult<()> {
        require_positive("epoch_length", self.epoch_length)?;
        require_positive("sampling_rate", self.sampling_rate)?;

        if !(self.overlap.is_finite() && (0.0..1.0).contains(&self.overlap)) {
            return Err(config_error!("overlap must be in [0, 1), got {}", self.overlap));
        }

        if self.samples_per_epoch() == 0 {
            return Err(config_error!(
                "epoch of {} s at {} Hz holds no samples",
                self.epoch_length,
                self.sampling_rate
            ));
        }

        Ok(())
    }
}

/// Structural epoch checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum fraction of present cells for an epoch to be assessed
    pub min_valid_ratio: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { min_valid_ratio: 0.5 }
    }
}

impl ValidationConfig {
    pub fn validate(&self) -> EegResult<()> {
        require_unit_interval("min_valid_ratio", self.min_valid_ratio)
    }
}

/// Relative weight of each metric in the overall score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricWeights {
    pub nan: f64,
    pub gap: f64,
    pub outlier: f64,
    pub flatline: f64,
    pub sharpness: f64,
    pub cohesion: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self::equal()
    }
}

impl MetricWeights {
    /// Every metric counts the same
    pub fn equal() -> Self {
        Self {
            nan: 1.0,
            gap: 1.0,
            outlier: 1.0,
            flatline: 1.0,
            sharpness: 1.0,
            cohesion: 1.0,
        }
    }

    pub fn weight(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Nan => self.nan,
            MetricKind::Gap => self.gap,
            MetricKind::Outlier => self.outlier,
            MetricKind::Flatline => self.flatline,
            MetricKind::Sharpness => self.sharpness,
            MetricKind::Cohesion => self.cohesion,
        }
    }

    pub fn total(&self) -> f64 {
        MetricKind::ALL.iter().map(|&kind| self.weight(kind)).sum()
    }

    pub fn validate(&self) -> EegResult<()> {
        for kind in MetricKind::ALL {
            let weight = self.weight(kind);
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(config_error!(
                    "weight for {} must be a non-negative number, got {}",
                    kind.name(),
                    weight
                ));
            }
        }

        if self.total() <= 0.0 {
            return Err(config_error!("at least one metric weight must be positive"));
        }

        Ok(())
    }
}

/// Metric parameters and the pass/fail threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Expected sampling rate of assessed epochs (Hz)
    pub sampling_rate: f64,
    /// Maximum missing fraction for a channel to count towards cohesion
    pub nan_threshold: f64,
    /// Missing runs longer than this many seconds count as gaps
    pub gap_threshold: f64,
    /// Outlier distance as a multiple of the channel spread
    pub outlier_threshold: f64,
    pub outlier_spread: SpreadMeasure,
    /// Flatline sliding window in seconds
    pub flatline_window: f64,
    /// Window variance below this fraction of channel variance is flat
    pub flatline_epsilon: f64,
    /// Sharp transitions exceed this many robust deviations
    pub sharpness_threshold: f64,
    /// Allowed ratio between a channel's spread and the montage median
    pub cohesion_ratio: f64,
    /// Minimum mean |correlation| between a channel and the rest of the montage
    pub cohesion_min_correlation: f64,
    /// Minimum overall quality for an epoch to pass
    pub quality_threshold: f64,
    pub weights: MetricWeights,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 128.0,
            nan_threshold: 0.15,
            gap_threshold: 0.1,
            outlier_threshold: 3.0,
            outlier_spread: SpreadMeasure::default(),
            flatline_window: 1.0,
            flatline_epsilon: 1e-4,
            sharpness_threshold: 8.0,
            cohesion_ratio: 10.0,
            cohesion_min_correlation: 0.2,
            quality_threshold: 0.7,
            weights: MetricWeights::default(),
        }
    }
}

impl QualityConfig {
    pub fn validate(&self) -> EegResult<()> {
        require_positive("sampling_rate", self.sampling_rate)?;
        require_unit_interval("quality_threshold", self.quality_threshold)?;
        require_unit_interval("nan_threshold", self.nan_threshold)?;
        require_unit_interval("gap_threshold", self.gap_threshold)?;
        require_unit_interval("cohesion_min_correlation", self.cohesion_min_correlation)?;
        require_positive("outlier_threshold", self.outlier_threshold)?;
        require_positive("flatline_window", self.flatline_window)?;
        require_positive("sharpness_threshold", self.sharpness_threshold)?;

        if !(self.flatline_epsilon.is_finite() && self.flatline_epsilon >= 0.0) {
            return Err(config_error!(
                "flatline_epsilon must be a non-negative number, got {}",
                self.flatline_epsilon
            ));
        }

        if !(self.cohesion_ratio.is_finite() && self.cohesion_ratio >= 1.0) {
            return Err(config_error!("cohesion_ratio must be at least 1, got {}", self.cohesion_ratio));
        }

        self.weights.validate()
    }
}

/// How the worker pool reacts to a per-epoch failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Record the failure against its epoch and keep going
    #[default]
    Isolate,
    /// Cancel remaining work and abort the batch
    FailFast,
}

/// Worker pool settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Concurrent assessments; `0` uses the available parallelism
    pub workers: usize,
    pub failure_policy: FailurePolicy,
}

impl BatchConfig {
    /// Worker count after resolving `0`
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        }
    }
}

/// Full epoch → quality configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub epoch: EpochConfig,
    pub validation: ValidationConfig,
    pub quality: QualityConfig,
    pub batch: BatchConfig,
}

/// Preset configurations for common scenarios
impl PipelineConfig {
    /// Short epochs for quick screening of a recording
    pub fn screening(sampling_rate: f64) -> Self {
        Self::default()
            .with_sampling_rate(sampling_rate)
            .with_epoch_length(10.0)
    }

    /// Five-minute epochs with 50% overlap for long-term monitoring
    pub fn long_term_monitoring(sampling_rate: f64) -> Self {
        let mut config = Self::default().with_sampling_rate(sampling_rate);
        config.epoch.overlap = 0.5;
        config
    }

    /// Set the sampling rate for both extraction and assessment
    pub fn with_sampling_rate(mut self, sampling_rate: f64) -> Self {
        self.epoch.sampling_rate = sampling_rate;
        self.quality.sampling_rate = sampling_rate;
        self
    }

    pub fn with_epoch_length(mut self, epoch_length: f64) -> Self {
        self.epoch.epoch_length = epoch_length;
        self
    }

    pub fn with_quality_threshold(mut self, quality_threshold: f64) -> Self {
        self.quality.quality_threshold = quality_threshold;
        self
    }

    /// Look up a preset by name
    pub fn preset(name: &str, sampling_rate: f64) -> Option<Self> {
        match name {
            "default" => Some(Self::default().with_sampling_rate(sampling_rate)),
            "screening" => Some(Self::screening(sampling_rate)),
            "long-term" | "long_term_monitoring" => Some(Self::long_term_monitoring(sampling_rate)),
            _ => None,
        }
    }

    /// Validate entire configuration
    pub fn validate(&self) -> EegResult<()> {
        self.epoch.validate()?;
        self.validation.validate()?;
        self.quality.validate()?;

        if (self.epoch.sampling_rate - self.quality.sampling_rate).abs() > f64::EPSILON * self.epoch.sampling_rate {
            return Err(config_error!(
                "extraction rate {} Hz differs from assessment rate {} Hz",
                self.epoch.sampling_rate,
                self.quality.sampling_rate
            ));
        }

        Ok(())
    }

    /// Export configuration to JSON
    pub fn to_json(&self) -> EegResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EegError::Serialization {
            message: format!("Failed to serialize configuration: {}", e),
        })
    }

    /// Import and validate configuration from JSON
    pub fn from_json(json: &str) -> EegResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| config_error!("Failed to deserialize configuration: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}

fn require_positive(name: &str, value: f64) -> EegResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(config_error!("{} must be a positive number, got {}", name, value))
    }
}

fn require_unit_interval(name: &str, value: f64) -> EegResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(config_error!("{} must be in [0, 1], got {}", name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.epoch.samples_per_epoch(), 38_400);
        assert_eq!(config.epoch.step(), 38_400);
        assert_eq!(config.quality.quality_threshold, 0.7);
        assert_eq!(config.batch.failure_policy, FailurePolicy::Isolate);
    }

    #[test]
    fn test_presets() {
        let screening = PipelineConfig::screening(256.0);
        assert!(screening.validate().is_ok());
        assert_eq!(screening.epoch.samples_per_epoch(), 2560);
        assert_eq!(screening.quality.sampling_rate, 256.0);

        let monitoring = PipelineConfig::long_term_monitoring(128.0);
        assert_eq!(monitoring.epoch.step(), 19_200);

        assert!(PipelineConfig::preset("screening", 128.0).is_some());
        assert!(PipelineConfig::preset("clinical", 128.0).is_none());
    }

    #[test]
    fn test_epoch_config_rejections() {
        let bad = [
            EpochConfig { epoch_length: 0.0, ..EpochConfig::default() },
            EpochConfig { epoch_length: -2.0, ..EpochConfig::default() },
            EpochConfig { sampling_rate: 0.0, ..EpochConfig::default() },
            EpochConfig { overlap: 1.0, ..EpochConfig::default() },
            EpochConfig { overlap: -0.1, ..EpochConfig::default() },
            EpochConfig { overlap: f64::NAN, ..EpochConfig::default() },
            EpochConfig { epoch_length: 0.001, sampling_rate: 100.0, ..EpochConfig::default() },
        ];
        for config in bad {
            let err = config.validate().unwrap_err();
            assert!(err.is_configuration(), "{:?}", config);
        }
    }

    #[test]
    fn test_step_never_zero() {
        let config = EpochConfig {
            epoch_length: 1.0,
            sampling_rate: 1.0,
            overlap: 0.9,
            ..EpochConfig::default()
        };
        assert_eq!(config.step(), 1);
    }

    #[test]
    fn test_quality_config_rejections() {
        let cases = [
            QualityConfig { quality_threshold: 1.2, ..QualityConfig::default() },
            QualityConfig { nan_threshold: -0.1, ..QualityConfig::default() },
            QualityConfig { gap_threshold: 2.0, ..QualityConfig::default() },
            QualityConfig { outlier_threshold: 0.0, ..QualityConfig::default() },
            QualityConfig { sampling_rate: -128.0, ..QualityConfig::default() },
            QualityConfig { cohesion_ratio: 0.5, ..QualityConfig::default() },
            QualityConfig { cohesion_min_correlation: 1.5, ..QualityConfig::default() },
        ];
        for config in cases {
            assert!(config.validate().is_err());
        }

        // outlier multiplier is not confined to the unit interval
        let wide = QualityConfig { outlier_threshold: 5.0, ..QualityConfig::default() };
        assert!(wide.validate().is_ok());
    }

    #[test]
    fn test_weight_validation() {
        let zero = MetricWeights {
            nan: 0.0,
            gap: 0.0,
            outlier: 0.0,
            flatline: 0.0,
            sharpness: 0.0,
            cohesion: 0.0,
        };
        assert!(zero.validate().is_err());

        let negative = MetricWeights { gap: -1.0, ..MetricWeights::equal() };
        assert!(negative.validate().is_err());

        let only_nan = MetricWeights { nan: 2.0, ..zero };
        assert!(only_nan.validate().is_ok());
        assert_eq!(only_nan.total(), 2.0);
    }

    #[test]
    fn test_rate_mismatch_rejected() {
        let mut config = PipelineConfig::default();
        config.quality.sampling_rate = 256.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = PipelineConfig::screening(256.0).with_quality_threshold(0.8);
        let json = config.to_json().unwrap();
        assert_eq!(PipelineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_from_json_uses_defaults_and_validates() {
        let partial = r#"{ "epoch": { "epoch_length": 30.0 } }"#;
        let config = PipelineConfig::from_json(partial).unwrap();
        assert_eq!(config.epoch.epoch_length, 30.0);
        assert_eq!(config.validation.min_valid_ratio, 0.5);

        let invalid = r#"{ "quality": { "quality_threshold": 3.0 } }"#;
        assert!(PipelineConfig::from_json(invalid).unwrap_err().is_configuration());
        assert!(PipelineConfig::from_json("not json").is_err());
    }
}
