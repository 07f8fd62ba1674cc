//! Epoch → quality pipeline
//!
//! Raw signal in, epoch table plus quality table out. Structurally broken
//! epochs are filtered by the validator before any metric runs.

use crate::assessor::QualityAssessor;
use crate::batch::{BatchAssessor, BatchOutcome, CancellationFlag};
use crate::config::PipelineConfig;
use crate::extractor::EpochExtractor;
use crate::report::QualityTable;
use crate::validator::{EpochValidator, RejectedEpoch};
use eeg_core::{EegResult, Epoch, EpochTable, MultiChannelSignal, RecordingMetadata};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Everything one pipeline run produced
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub epochs: EpochTable,
    pub rejected: Vec<RejectedEpoch>,
    pub outcome: BatchOutcome,
    pub quality: QualityTable,
    pub warnings: Vec<String>,
    pub elapsed: Duration,
}

impl PipelineResult {
    /// Epochs whose quality row passes the threshold, in extraction order
    pub fn usable_epochs(&self) -> Vec<&Epoch> {
        self.quality
            .passing_ids()
            .into_iter()
            .filter_map(|id| self.epochs.get(id))
            .collect()
    }
}

/// Extraction, validation and assessment wired together
#[derive(Debug, Clone)]
pub struct EpochPipeline {
    config: PipelineConfig,
    extractor: EpochExtractor,
    validator: EpochValidator,
    assessor: Arc<QualityAssessor>,
    batch: BatchAssessor,
}

impl EpochPipeline {
    pub fn new(config: PipelineConfig) -> EegResult<Self> {
        config.validate()?;

        let extractor = EpochExtractor::new(config.epoch.clone())?;
        let validator = EpochValidator::new(config.validation.clone())?;
        let assessor = Arc::new(QualityAssessor::new(config.quality.clone())?);
        let batch = BatchAssessor::new(Arc::clone(&assessor), config.batch.clone());

        Ok(Self {
            config,
            extractor,
            validator,
            assessor,
            batch,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn extractor(&self) -> &EpochExtractor {
        &self.extractor
    }

    pub fn assessor(&self) -> &QualityAssessor {
        &self.assessor
    }

    /// Run every stage on the calling thread
    pub fn run(&self, signal: &MultiChannelSignal, metadata: Option<&RecordingMetadata>) -> PipelineResult {
        let start = Instant::now();
        let (epochs, accepted, rejected, mut warnings) = self.prepare(signal, metadata);

        let outcome = self.assessor.assess_many(&accepted);
        self.finish(epochs, rejected, outcome, &mut warnings, start)
    }

    /// Run extraction inline and assessment on the worker pool
    pub async fn run_parallel(
        &self,
        signal: &MultiChannelSignal,
        metadata: Option<&RecordingMetadata>,
        cancel: &CancellationFlag,
    ) -> EegResult<PipelineResult> {
        let start = Instant::now();
        let (epochs, accepted, rejected, mut warnings) = self.prepare(signal, metadata);

        let outcome = self.batch.assess_many(accepted, cancel).await?;
        Ok(self.finish(epochs, rejected, outcome, &mut warnings, start))
    }

    fn prepare(
        &self,
        signal: &MultiChannelSignal,
        metadata: Option<&RecordingMetadata>,
    ) -> (EpochTable, Vec<Epoch>, Vec<RejectedEpoch>, Vec<String>) {
        let mut warnings = Vec::new();

        if signal.sampling_rate() != self.config.epoch.sampling_rate {
            warnings.push(format!(
                "Signal sampled at {} Hz but pipeline configured for {} Hz",
                signal.sampling_rate(),
                self.config.epoch.sampling_rate
            ));
        }
        if let Some(Err(e)) = metadata.map(RecordingMetadata::parsed_start_time) {
            warnings.push(format!("Recording start time ignored: {}", e));
        }

        let epochs = self.extractor.extract(signal, metadata);
        let (accepted, rejected) = self.validator.partition(&epochs);
        warnings.extend(
            rejected
                .iter()
                .map(|r| format!("Epoch {} rejected: {}", r.epoch_id, r.verdict.reason)),
        );

        (epochs, accepted, rejected, warnings)
    }

    fn finish(
        &self,
        epochs: EpochTable,
        rejected: Vec<RejectedEpoch>,
        outcome: BatchOutcome,
        warnings: &mut Vec<String>,
        start: Instant,
    ) -> PipelineResult {
        warnings.extend(
            outcome
                .failures()
                .into_iter()
                .map(|(id, e)| format!("Epoch {} failed: {}", id, e)),
        );
        let skipped = outcome.skipped();
        if !skipped.is_empty() {
            warnings.push(format!("{} epochs skipped after cancellation", skipped.len()));
        }

        let quality = outcome.quality_table();
        let summary = quality.summary();
        info!(
            "Run {}: {} epochs, {} rejected, {} assessed, {} passing (mean quality {:.3})",
            epochs.run_id(),
            epochs.len(),
            rejected.len(),
            summary.count,
            summary.passing,
            summary.mean_overall_quality
        );

        PipelineResult {
            epochs,
            rejected,
            outcome,
            quality,
            warnings: std::mem::take(warnings),
            elapsed: start.elapsed(),
        }
    }
}
