//! Epoch extraction: fixed-length windowing of a continuous recording
//!
//! Windows start at `0, step, 2·step, …` while the start lies inside the
//! signal. Each epoch owns a copy of its samples. A trailing window shorter
//! than the nominal length is kept or dropped according to the
//! [`TailPolicy`](crate::config::TailPolicy).

use crate::config::EpochConfig;
use eeg_core::{Epoch, EpochTable, EegResult, MultiChannelSignal, NaiveTime, RecordingMetadata, TimeIndexer};
use tracing::{debug, warn};

/// Segments signals into epochs
#[derive(Debug, Clone)]
pub struct EpochExtractor {
    config: EpochConfig,
    samples_per_epoch: usize,
    step: usize,
}

impl EpochExtractor {
    pub fn new(config: EpochConfig) -> EegResult<Self> {
        config.validate()?;
        let samples_per_epoch = config.samples_per_epoch();
        let step = config.step();

        Ok(Self {
            config,
            samples_per_epoch,
            step,
        })
    }

    pub fn config(&self) -> &EpochConfig {
        &self.config
    }

    pub fn samples_per_epoch(&self) -> usize {
        self.samples_per_epoch
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// `epoch_length × sampling_rate`, before rounding
    pub fn nominal_samples(&self) -> f64 {
        self.config.epoch_length * self.config.sampling_rate
    }

    /// Within one sample of the nominal epoch length
    pub fn is_nominal_length(&self, len: usize) -> bool {
        (len as f64 - self.nominal_samples()).abs() <= 1.0
    }

    /// Cut `signal` into epochs
    ///
    /// A start time in `metadata` wins over the signal's own. Without either,
    /// epochs carry no wall-clock stamps.
    pub fn extract(&self, signal: &MultiChannelSignal, metadata: Option<&RecordingMetadata>) -> EpochTable {
        if signal.sampling_rate() != self.config.sampling_rate {
            warn!(
                "Signal sampled at {} Hz, windowing at configured {} Hz",
                signal.sampling_rate(),
                self.config.sampling_rate
            );
        }

        let origin = self.resolve_start_time(signal, metadata);
        let total = signal.len();
        let mut epochs = Vec::with_capacity(total / self.step + 1);
        let mut start = 0;

        while start < total {
            let end = (start + self.samples_per_epoch).min(total);
            let len = end - start;
            let truncated = len < self.samples_per_epoch;

            // later windows are only shorter
            if truncated && !self.config.tail_policy.keeps(len, self.samples_per_epoch) {
                debug!("Dropping {}-sample tail at offset {}", len, start);
                break;
            }

            let epoch_id = epochs.len() as u64;
            let start_time = TimeIndexer::timestamp_at(origin, start, self.config.sampling_rate);
            let end_time = TimeIndexer::timestamp_at(origin, end, self.config.sampling_rate);

            epochs.push(
                Epoch::new(epoch_id, start, signal.slice(start, end))
                    .with_times(start_time, end_time)
                    .with_truncated(truncated),
            );
            start += self.step;
        }

        debug!(
            "Extracted {} epochs of {} samples (step {}) from {} samples",
            epochs.len(),
            self.samples_per_epoch,
            self.step,
            total
        );

        EpochTable::new(signal.channel_names().to_vec(), epochs)
    }

    fn resolve_start_time(&self, signal: &MultiChannelSignal, metadata: Option<&RecordingMetadata>) -> Option<NaiveTime> {
        let from_metadata = metadata.and_then(|m| match m.parsed_start_time() {
            Ok(time) => time,
            Err(e) => {
                warn!("Ignoring recording start time: {}", e);
                None
            }
        });

        from_metadata.or_else(|| signal.start_time())
    }
}
