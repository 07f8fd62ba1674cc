//! Quality reports and the quality table

use crate::metrics::MetricKind;
use eeg_core::{EegError, EegResult};
use serde::Serialize;

/// One score per metric, laid out as quality table columns
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MetricScores {
    pub nan_quality: f64,
    pub gap_quality: f64,
    pub outlier_quality: f64,
    pub flatline_quality: f64,
    pub sharpness_quality: f64,
    pub cohesion_quality: f64,
}

impl MetricScores {
    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Nan => self.nan_quality,
            MetricKind::Gap => self.gap_quality,
            MetricKind::Outlier => self.outlier_quality,
            MetricKind::Flatline => self.flatline_quality,
            MetricKind::Sharpness => self.sharpness_quality,
            MetricKind::Cohesion => self.cohesion_quality,
        }
    }

    pub(crate) fn set(&mut self, kind: MetricKind, score: f64) {
        let slot = match kind {
            MetricKind::Nan => &mut self.nan_quality,
            MetricKind::Gap => &mut self.gap_quality,
            MetricKind::Outlier => &mut self.outlier_quality,
            MetricKind::Flatline => &mut self.flatline_quality,
            MetricKind::Sharpness => &mut self.sharpness_quality,
            MetricKind::Cohesion => &mut self.cohesion_quality,
        };
        *slot = score;
    }

    /// `(metric name, score)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        MetricKind::ALL.into_iter().map(move |kind| (kind.name(), self.get(kind)))
    }
}

/// Quality verdict for one epoch
///
/// Reports are built by the assessor only, so `passes_threshold` always
/// agrees with `overall_quality` and the threshold it was judged against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    epoch_id: u64,
    overall_quality: f64,
    passes_threshold: bool,
    #[serde(flatten)]
    scores: MetricScores,
}

impl QualityReport {
    pub(crate) fn new(epoch_id: u64, scores: MetricScores, overall_quality: f64, quality_threshold: f64) -> Self {
        Self {
            epoch_id,
            overall_quality,
            passes_threshold: overall_quality >= quality_threshold,
            scores,
        }
    }

    pub fn epoch_id(&self) -> u64 {
        self.epoch_id
    }

    pub fn overall_quality(&self) -> f64 {
        self.overall_quality
    }

    pub fn passes_threshold(&self) -> bool {
        self.passes_threshold
    }

    pub fn scores(&self) -> &MetricScores {
        &self.scores
    }

    pub fn score(&self, kind: MetricKind) -> f64 {
        self.scores.get(kind)
    }
}

/// Aggregate view of a quality table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualitySummary {
    pub count: usize,
    pub passing: usize,
    /// Mean overall quality, `0.0` for an empty table
    pub mean_overall_quality: f64,
}

impl QualitySummary {
    pub fn pass_rate(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.passing as f64 / self.count as f64
        }
    }
}

/// Quality rows keyed by epoch id, in input order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct QualityTable {
    rows: Vec<QualityReport>,
}

impl QualityTable {
    pub fn from_reports(rows: Vec<QualityReport>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[QualityReport] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, epoch_id: u64) -> Option<&QualityReport> {
        self.rows.iter().find(|row| row.epoch_id == epoch_id)
    }

    /// Ids of epochs fit for downstream feature extraction
    pub fn passing_ids(&self) -> Vec<u64> {
        self.rows
            .iter()
            .filter(|row| row.passes_threshold)
            .map(|row| row.epoch_id)
            .collect()
    }

    pub fn summary(&self) -> QualitySummary {
        let count = self.rows.len();
        let passing = self.rows.iter().filter(|row| row.passes_threshold).count();
        let mean_overall_quality = if count == 0 {
            0.0
        } else {
            self.rows.iter().map(|row| row.overall_quality).sum::<f64>() / count as f64
        };

        QualitySummary {
            count,
            passing,
            mean_overall_quality,
        }
    }

    /// Render the table as a JSON array of rows
    pub fn to_json(&self) -> EegResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EegError::Serialization {
            message: format!("Failed to serialize quality table: {}", e),
        })
    }
}

impl<'a> IntoIterator for &'a QualityTable {
    type Item = &'a QualityReport;
    type IntoIter = std::slice::Iter<'a, QualityReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
