//! Signal quality metrics
//!
//! Each metric maps one epoch's samples to a score in `[0, 1]`, higher is
//! better. Metrics are pure and independent of each other. Missing samples
//! are `NaN`; data with no cells scores `0.0` everywhere.

use crate::config::QualityConfig;
use eeg_core::{config_error, ChannelStats, EegResult, MultiChannelSignal};
use serde::{Deserialize, Serialize};

/// Consistency constant turning a median absolute deviation into a
/// standard-deviation estimate for Gaussian data
const MAD_SCALE: f64 = 1.4826;

/// Absolute variance floor below which any window counts as flat
const FLAT_VARIANCE_FLOOR: f64 = 1e-12;

/// Identifies one metric and its column in the quality table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetricKind {
    Nan,
    Gap,
    Outlier,
    Flatline,
    Sharpness,
    Cohesion,
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Nan,
        MetricKind::Gap,
        MetricKind::Outlier,
        MetricKind::Flatline,
        MetricKind::Sharpness,
        MetricKind::Cohesion,
    ];

    /// Column name in the quality table
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::Nan => "nan_quality",
            MetricKind::Gap => "gap_quality",
            MetricKind::Outlier => "outlier_quality",
            MetricKind::Flatline => "flatline_quality",
            MetricKind::Sharpness => "sharpness_quality",
            MetricKind::Cohesion => "cohesion_quality",
        }
    }
}

/// Core trait for quality metrics
pub trait QualityMetric: Send + Sync {
    /// Which column this metric fills
    fn kind(&self) -> MetricKind;

    /// Score one epoch's data, `1.0` meaning no problem detected
    fn score(&self, data: &MultiChannelSignal) -> f64;

    fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// Spread estimate used to decide what counts as an outlier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpreadMeasure {
    /// Population standard deviation around the mean
    StandardDeviation,
    /// Scaled median absolute deviation around the median; insensitive to a
    /// handful of extreme samples
    #[default]
    MedianAbsoluteDeviation,
}

/// Fraction of samples present
#[derive(Debug, Clone, Copy, Default)]
pub struct NanQuality;

impl QualityMetric for NanQuality {
    fn kind(&self) -> MetricKind {
        MetricKind::Nan
    }

    fn score(&self, data: &MultiChannelSignal) -> f64 {
        let cells = data.cell_count();
        if cells == 0 {
            return 0.0;
        }
        1.0 - data.missing_count() as f64 / cells as f64
    }
}

/// Penalises long runs of consecutive missing samples
#[derive(Debug, Clone, Copy)]
pub struct GapQuality {
    /// Runs longer than this many seconds are gaps
    pub gap_threshold: f64,
}

impl GapQuality {
    fn channel_score(&self, samples: &[f64], min_gap: usize) -> f64 {
        let n = samples.len();
        let mut gap_samples = 0;
        let mut run = 0;

        for value in samples.iter().chain(std::iter::once(&0.0)) {
            if value.is_nan() {
                run += 1;
                continue;
            }
            if run > min_gap || run == n {
                gap_samples += run;
            }
            run = 0;
        }

        1.0 - gap_samples as f64 / n as f64
    }
}

impl QualityMetric for GapQuality {
    fn kind(&self) -> MetricKind {
        MetricKind::Gap
    }

    fn score(&self, data: &MultiChannelSignal) -> f64 {
        let min_gap = (self.gap_threshold * data.sampling_rate()).round() as usize;
        mean_over_channels(data, |samples| self.channel_score(samples, min_gap))
    }
}

/// Fraction of samples within a multiple of the channel spread
///
/// Outliers are counted per channel around its median (or mean) using the
/// configured [`SpreadMeasure`].
#[derive(Debug, Clone, Copy)]
pub struct OutlierQuality {
    pub threshold: f64,
    pub spread: SpreadMeasure,
}

impl OutlierQuality {
    fn channel_score(&self, samples: &[f64]) -> f64 {
        let present = present_values(samples);
        if present.is_empty() {
            return 0.0;
        }

        let (centre, spread) = match self.spread {
            SpreadMeasure::StandardDeviation => {
                let stats = ChannelStats::calculate(&present);
                (stats.mean, stats.std_dev)
            }
            SpreadMeasure::MedianAbsoluteDeviation => {
                let centre = median(&present);
                let deviations: Vec<f64> = present.iter().map(|v| (v - centre).abs()).collect();
                (centre, MAD_SCALE * median(&deviations))
            }
        };

        // zero spread: anything off the centre is an outlier
        let limit = self.threshold * spread;
        let inliers = present.iter().filter(|v| (*v - centre).abs() <= limit).count();
        inliers as f64 / present.len() as f64
    }
}

impl QualityMetric for OutlierQuality {
    fn kind(&self) -> MetricKind {
        MetricKind::Outlier
    }

    fn score(&self, data: &MultiChannelSignal) -> f64 {
        mean_over_channels(data, |samples| self.channel_score(samples))
    }
}

/// Penalises stretches where the signal stops moving
///
/// A sliding window of `window` seconds slides one sample at a time. A
/// window holding at least two present values whose variance falls below
/// `max(epsilon * channel_variance, 1e-12)` marks all its present samples
/// flat. The channel score is one minus the flat fraction.
#[derive(Debug, Clone, Copy)]
pub struct FlatlineQuality {
    pub window: f64,
    pub epsilon: f64,
}

impl FlatlineQuality {
    fn channel_score(&self, samples: &[f64], window: usize) -> f64 {
        let n = samples.len();
        let Some(&reference) = samples.iter().find(|v| !v.is_nan()) else {
            return 0.0;
        };

        let stats = ChannelStats::calculate(samples);
        if stats.present < 2 {
            return 0.0;
        }
        let tolerance = (self.epsilon * stats.std_dev * stats.std_dev).max(FLAT_VARIANCE_FLOOR);

        // prefix sums of reference-shifted values keep constant runs exact
        let mut count = vec![0usize; n + 1];
        let mut sum = vec![0.0; n + 1];
        let mut sum_sq = vec![0.0; n + 1];
        for (i, &value) in samples.iter().enumerate() {
            let (c, s, q) = if value.is_nan() {
                (0, 0.0, 0.0)
            } else {
                let shifted = value - reference;
                (1, shifted, shifted * shifted)
            };
            count[i + 1] = count[i] + c;
            sum[i + 1] = sum[i] + s;
            sum_sq[i + 1] = sum_sq[i] + q;
        }

        let window = window.min(n);
        let mut flat = vec![false; n];
        let mut marked_until = 0;
        for start in 0..=(n - window) {
            let end = start + window;
            let c = count[end] - count[start];
            if c < 2 {
                continue;
            }

            let c = c as f64;
            let mean = (sum[end] - sum[start]) / c;
            let variance = ((sum_sq[end] - sum_sq[start]) / c - mean * mean).max(0.0);
            if variance <= tolerance {
                for slot in flat.iter_mut().take(end).skip(start.max(marked_until)) {
                    *slot = true;
                }
                marked_until = end;
            }
        }

        let flat_present = samples
            .iter()
            .zip(&flat)
            .filter(|(value, is_flat)| **is_flat && !value.is_nan())
            .count();
        1.0 - flat_present as f64 / n as f64
    }
}

impl QualityMetric for FlatlineQuality {
    fn kind(&self) -> MetricKind {
        MetricKind::Flatline
    }

    fn score(&self, data: &MultiChannelSignal) -> f64 {
        let window = ((self.window * data.sampling_rate()).round() as usize).max(2);
        mean_over_channels(data, |samples| self.channel_score(samples, window))
    }
}

/// Penalises abrupt jumps relative to the channel's typical curvature
#[derive(Debug, Clone, Copy)]
pub struct SharpnessQuality {
    pub threshold: f64,
}

impl SharpnessQuality {
    fn channel_score(&self, samples: &[f64]) -> f64 {
        let present = present_values(samples);
        if present.is_empty() {
            return 0.0;
        }
        if present.len() < 3 {
            return 1.0;
        }

        let curvature: Vec<f64> = present
            .windows(3)
            .map(|w| (w[2] - 2.0 * w[1] + w[0]).abs())
            .collect();

        let stats = ChannelStats::calculate(&present);
        let tolerance = (self.threshold * MAD_SCALE * median(&curvature))
            .max(1e-9 * stats.peak_to_peak)
            .max(f64::MIN_POSITIVE);

        let sharp = curvature.iter().filter(|&&d| d > tolerance).count();
        1.0 - sharp as f64 / curvature.len() as f64
    }
}

impl QualityMetric for SharpnessQuality {
    fn kind(&self) -> MetricKind {
        MetricKind::Sharpness
    }

    fn score(&self, data: &MultiChannelSignal) -> f64 {
        mean_over_channels(data, |samples| self.channel_score(samples))
    }
}

/// Fraction of channels that behave like the rest of the montage
///
/// A channel is coherent when it is mostly present, its spread lies within
/// `ratio` of the montage median, and its mean |Pearson correlation| with the
/// other eligible channels reaches `min_correlation`.
#[derive(Debug, Clone, Copy)]
pub struct CohesionQuality {
    /// Channels missing more than this fraction are incoherent
    pub nan_threshold: f64,
    /// Allowed ratio between a channel's spread and the montage median
    pub ratio: f64,
    pub min_correlation: f64,
}

impl CohesionQuality {
    fn agrees(&self, index: usize, eligible: &[(&[f64], f64)], centre: f64) -> bool {
        let (samples, std_dev) = eligible[index];
        let amplitude_agrees = if centre == 0.0 {
            std_dev == 0.0
        } else {
            std_dev >= centre / self.ratio && std_dev <= centre * self.ratio
        };
        if !amplitude_agrees {
            return false;
        }

        let peers = eligible.len() - 1;
        if peers == 0 {
            return true;
        }
        let total: f64 = eligible
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != index)
            .map(|(_, (peer, _))| correlation(samples, peer).abs())
            .sum();
        total / peers as f64 >= self.min_correlation
    }
}

impl QualityMetric for CohesionQuality {
    fn kind(&self) -> MetricKind {
        MetricKind::Cohesion
    }

    fn score(&self, data: &MultiChannelSignal) -> f64 {
        if data.is_empty() {
            return 0.0;
        }
        let channel_count = data.channel_count();
        if channel_count == 1 {
            return 1.0;
        }

        let eligible: Vec<(&[f64], f64)> = data
            .channels()
            .iter()
            .filter_map(|samples| {
                let stats = ChannelStats::calculate(samples);
                let missing = stats.missing as f64 / samples.len() as f64;
                (missing <= self.nan_threshold).then_some((samples.as_slice(), stats.std_dev))
            })
            .collect();

        if eligible.is_empty() {
            return 0.0;
        }

        let spreads: Vec<f64> = eligible.iter().map(|&(_, std_dev)| std_dev).collect();
        let centre = median(&spreads);

        let coherent = (0..eligible.len())
            .filter(|&index| self.agrees(index, &eligible, centre))
            .count();
        coherent as f64 / channel_count as f64
    }
}

/// The fixed set of metrics behind every quality report
pub struct QualityMetricSuite {
    metrics: Vec<Box<dyn QualityMetric>>,
}

impl QualityMetricSuite {
    /// Standard suite parameterised from configuration
    pub fn from_config(config: &QualityConfig) -> Self {
        Self {
            metrics: vec![
                Box::new(NanQuality),
                Box::new(GapQuality {
                    gap_threshold: config.gap_threshold,
                }),
                Box::new(OutlierQuality {
                    threshold: config.outlier_threshold,
                    spread: config.outlier_spread,
                }),
                Box::new(FlatlineQuality {
                    window: config.flatline_window,
                    epsilon: config.flatline_epsilon,
                }),
                Box::new(SharpnessQuality {
                    threshold: config.sharpness_threshold,
                }),
                Box::new(CohesionQuality {
                    nan_threshold: config.nan_threshold,
                    ratio: config.cohesion_ratio,
                    min_correlation: config.cohesion_min_correlation,
                }),
            ],
        }
    }

    /// Custom suite; every metric kind must appear exactly once
    pub fn from_metrics(metrics: Vec<Box<dyn QualityMetric>>) -> EegResult<Self> {
        for kind in MetricKind::ALL {
            let count = metrics.iter().filter(|m| m.kind() == kind).count();
            if count != 1 {
                return Err(config_error!(
                    "metric suite needs exactly one {} metric, found {}",
                    kind.name(),
                    count
                ));
            }
        }

        if metrics.len() != MetricKind::ALL.len() {
            return Err(config_error!("metric suite holds {} metrics", metrics.len()));
        }

        Ok(Self { metrics })
    }

    /// Replace the metric of the same kind
    pub fn with_metric(mut self, metric: Box<dyn QualityMetric>) -> Self {
        let kind = metric.kind();
        self.metrics.retain(|m| m.kind() != kind);
        self.metrics.push(metric);
        self
    }

    pub fn metrics(&self) -> &[Box<dyn QualityMetric>] {
        &self.metrics
    }

    /// Raw scores in suite order
    pub fn score_all(&self, data: &MultiChannelSignal) -> Vec<(MetricKind, f64)> {
        self.metrics.iter().map(|m| (m.kind(), m.score(data))).collect()
    }
}

impl std::fmt::Debug for QualityMetricSuite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.metrics.iter().map(|m| m.name())).finish()
    }
}

/// Score averaged over channels; `0.0` for data without cells
fn mean_over_channels(data: &MultiChannelSignal, channel_score: impl Fn(&[f64]) -> f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let total: f64 = data.channels().iter().map(|samples| channel_score(samples.as_slice())).sum();
    (total / data.channel_count() as f64).clamp(0.0, 1.0)
}

/// Pearson correlation over samples present in both channels; `0.0` when
/// fewer than two samples overlap or either side does not vary
fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(&x, &y)| (x, y))
        .collect();
    if pairs.len() < 2 {
        return 0.0;
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|&(x, _)| x).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|&(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for &(x, y) in &pairs {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a <= 0.0 || var_b <= 0.0 {
        return 0.0;
    }
    (cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0)
}

fn present_values(samples: &[f64]) -> Vec<f64> {
    samples.iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Median of a non-empty slice
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use eeg_simulation::{montage, EegConfig, EegSimulator};

    fn signal(channels: Vec<Vec<f64>>, rate: f64) -> MultiChannelSignal {
        let names = (0..channels.len()).map(|i| format!("Ch{}", i + 1)).collect();
        MultiChannelSignal::from_channels(names, channels, rate).unwrap()
    }

    fn wave(n: usize, rate: f64) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64 / rate;
                (2.0 * std::f64::consts::PI * 10.0 * t).sin() + 0.5 * (2.0 * std::f64::consts::PI * 3.0 * t).sin()
            })
            .collect()
    }

    fn suite() -> QualityMetricSuite {
        QualityMetricSuite::from_config(&QualityConfig::default())
    }

    #[test]
    fn test_nan_quality() {
        let clean = signal(vec![wave(100, 100.0)], 100.0);
        assert_eq!(NanQuality.score(&clean), 1.0);

        let missing = signal(vec![vec![f64::NAN; 100]], 100.0);
        assert_eq!(NanQuality.score(&missing), 0.0);

        let mut half = wave(100, 100.0);
        half[..25].fill(f64::NAN);
        assert_relative_eq!(NanQuality.score(&signal(vec![half], 100.0)), 0.75);
    }

    #[test]
    fn test_gap_quality_ignores_short_runs() {
        let metric = GapQuality { gap_threshold: 0.1 };
        let mut samples = wave(100, 100.0);
        // 10-sample run is not longer than 0.1 s at 100 Hz
        samples[20..30].fill(f64::NAN);
        assert_eq!(metric.score(&signal(vec![samples.clone()], 100.0)), 1.0);

        samples[50..80].fill(f64::NAN);
        assert_relative_eq!(metric.score(&signal(vec![samples], 100.0)), 0.7);

        let all_missing = signal(vec![vec![f64::NAN; 5]], 100.0);
        assert_eq!(metric.score(&all_missing), 0.0);
    }

    #[test]
    fn test_gap_quality_trailing_run() {
        let metric = GapQuality { gap_threshold: 0.0 };
        let mut samples = vec![1.0; 10];
        samples[8..].fill(f64::NAN);
        assert_relative_eq!(metric.score(&signal(vec![samples], 10.0)), 0.8);
    }

    #[test]
    fn test_outlier_quality() {
        let metric = OutlierQuality {
            threshold: 3.0,
            spread: SpreadMeasure::StandardDeviation,
        };
        let constant = signal(vec![vec![2.0; 50]], 50.0);
        assert_eq!(metric.score(&constant), 1.0);

        let mut samples = wave(1000, 100.0);
        samples[500] = 1_000.0;
        let score = metric.score(&signal(vec![samples.clone()], 100.0));
        assert_relative_eq!(score, 0.999);

        let robust = OutlierQuality {
            threshold: 3.0,
            spread: SpreadMeasure::MedianAbsoluteDeviation,
        };
        let robust_score = robust.score(&signal(vec![samples], 100.0));
        assert!(robust_score > 0.9 && robust_score < 1.0);
    }

    #[test]
    fn test_outlier_on_mostly_constant_channel() {
        let mut samples = vec![2.0; 50];
        samples[10] = 9.0;
        let data = signal(vec![samples], 50.0);

        let robust = OutlierQuality {
            threshold: 3.0,
            spread: SpreadMeasure::default(),
        };
        assert_eq!(robust.spread, SpreadMeasure::MedianAbsoluteDeviation);
        assert_relative_eq!(robust.score(&data), 0.98);
    }

    #[test]
    fn test_flatline_quality() {
        let metric = FlatlineQuality {
            window: 1.0,
            epsilon: 1e-4,
        };
        let constant = signal(vec![vec![5.0; 300]], 100.0);
        assert_eq!(metric.score(&constant), 0.0);

        let varying = signal(vec![wave(300, 100.0)], 100.0);
        assert_eq!(metric.score(&varying), 1.0);

        let mut run = wave(1000, 100.0);
        run[200..500].fill(0.25);
        let score = metric.score(&signal(vec![run], 100.0));
        assert!(score < 0.71 && score > 0.6, "score {}", score);

        let single = signal(vec![vec![1.0]], 100.0);
        assert_eq!(metric.score(&single), 0.0);
    }

    #[test]
    fn test_sharpness_quality() {
        let metric = SharpnessQuality { threshold: 8.0 };
        let smooth = signal(vec![wave(500, 100.0)], 100.0);
        assert_eq!(metric.score(&smooth), 1.0);

        let ramp = signal(vec![(0..100).map(|i| i as f64 * 0.5).collect()], 100.0);
        assert_eq!(metric.score(&ramp), 1.0);

        let mut step = wave(500, 100.0);
        for v in step.iter_mut().skip(250) {
            *v += 50.0;
        }
        let score = metric.score(&signal(vec![step], 100.0));
        assert!(score < 1.0 && score > 0.99);

        let short = signal(vec![vec![1.0, 9.0]], 100.0);
        assert_eq!(metric.score(&short), 1.0);
    }

    #[test]
    fn test_cohesion_quality() {
        let metric = CohesionQuality {
            nan_threshold: 0.15,
            ratio: 10.0,
            min_correlation: 0.2,
        };
        let base = wave(200, 100.0);
        let loud: Vec<f64> = base.iter().map(|v| v * 100.0).collect();

        let coherent = signal(vec![base.clone(), base.clone(), base.clone()], 100.0);
        assert_eq!(metric.score(&coherent), 1.0);

        let one_loud = signal(vec![base.clone(), base.clone(), loud], 100.0);
        assert_relative_eq!(metric.score(&one_loud), 2.0 / 3.0);

        let dead = signal(vec![base.clone(), base.clone(), vec![f64::NAN; 200]], 100.0);
        assert_relative_eq!(metric.score(&dead), 2.0 / 3.0);

        let single = signal(vec![base], 100.0);
        assert_eq!(metric.score(&single), 1.0);
    }

    #[test]
    fn test_cohesion_flags_uncorrelated_channel() {
        let metric = CohesionQuality {
            nan_threshold: 0.15,
            ratio: 10.0,
            min_correlation: 0.2,
        };
        let base = wave(1000, 100.0);
        let target = ChannelStats::calculate(&base).std_dev;

        let config = EegConfig::white_noise(100.0, montage(1), 17);
        let noise = EegSimulator::new(config).unwrap().generate(10.0).unwrap();
        let noise = noise.channel(0).unwrap();
        let scale = target / ChannelStats::calculate(noise).std_dev;
        let noise: Vec<f64> = noise.iter().map(|v| v * scale).collect();
        assert!(correlation(&base, &noise).abs() < 0.2);

        let data = signal(vec![base.clone(), base.clone(), base, noise], 100.0);
        assert_relative_eq!(metric.score(&data), 0.75);
    }

    #[test]
    fn test_correlation_edge_cases() {
        let ramp: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let inverted: Vec<f64> = ramp.iter().map(|v| -2.0 * v).collect();
        assert_relative_eq!(correlation(&ramp, &inverted), -1.0, epsilon = 1e-12);

        assert_eq!(correlation(&ramp, &[4.0; 10]), 0.0);
        assert_eq!(correlation(&[1.0, f64::NAN], &[f64::NAN, 2.0]), 0.0);

        let mut gappy = ramp.clone();
        gappy[3] = f64::NAN;
        assert_relative_eq!(correlation(&ramp, &gappy), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_inputs_stay_in_range() {
        let fixtures = vec![
            signal(vec![], 100.0),
            signal(vec![vec![], vec![]], 100.0),
            signal(vec![vec![f64::NAN; 40], vec![f64::NAN; 40]], 100.0),
            signal(vec![vec![3.0; 40], vec![3.0; 40]], 100.0),
            signal(vec![vec![1.0], vec![-1.0]], 100.0),
            signal(vec![vec![1.0, f64::NAN, 3.0]], 100.0),
        ];
        let suite = suite();

        for data in &fixtures {
            for (kind, score) in suite.score_all(data) {
                assert!(
                    (0.0..=1.0).contains(&score),
                    "{} gave {} for {:?}",
                    kind.name(),
                    score,
                    data
                );
            }
        }

        for (_, score) in suite.score_all(&fixtures[0]) {
            assert_eq!(score, 0.0);
        }
    }

    #[test]
    fn test_suite_composition() {
        let suite = suite();
        let kinds: Vec<MetricKind> = suite.metrics().iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, MetricKind::ALL.to_vec());

        let swapped = suite.with_metric(Box::new(SharpnessQuality { threshold: 2.0 }));
        assert_eq!(swapped.metrics().len(), 6);

        let too_few: Vec<Box<dyn QualityMetric>> = vec![Box::new(NanQuality)];
        assert!(QualityMetricSuite::from_metrics(too_few).is_err());
    }
}
