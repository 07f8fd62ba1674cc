//! MultiChannelSignal: core container for multi-channel EEG data
//!
//! Samples are stored per channel as `f64`. Missing samples are `NaN`;
//! every other value is taken at face value.

use crate::error::EegResult;
use crate::signal_error;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Named, uniformly sampled multi-channel time series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiChannelSignal {
    sampling_rate: f64,
    channel_names: Vec<String>,
    channels: Vec<Vec<f64>>,
    start_time: Option<NaiveTime>,
}

impl MultiChannelSignal {
    /// Create a signal from per-channel sample arrays
    pub fn from_channels(
        channel_names: Vec<String>,
        channels: Vec<Vec<f64>>,
        sampling_rate: f64,
    ) -> EegResult<Self> {
        Self::validate_sampling_rate(sampling_rate)?;
        Self::validate_channel_names(&channel_names)?;

        if channels.len() != channel_names.len() {
            return Err(signal_error!(
                "{} channel names but {} channel arrays",
                channel_names.len(),
                channels.len()
            ));
        }

        if let Some(first) = channels.first() {
            let expected = first.len();
            if let Some((idx, ragged)) = channels.iter().enumerate().find(|(_, c)| c.len() != expected) {
                return Err(signal_error!(
                    "channel '{}' has {} samples, expected {}",
                    channel_names[idx],
                    ragged.len(),
                    expected
                ));
            }
        }

        Ok(Self {
            sampling_rate,
            channel_names,
            channels,
            start_time: None,
        })
    }

    /// Create a signal from time-major interleaved samples
    /// (`[s0_ch0, s0_ch1, ..., s1_ch0, s1_ch1, ...]`)
    pub fn from_interleaved(
        channel_names: Vec<String>,
        interleaved: &[f64],
        sampling_rate: f64,
    ) -> EegResult<Self> {
        let channel_count = channel_names.len();
        if channel_count == 0 {
            if !interleaved.is_empty() {
                return Err(signal_error!("samples supplied without any channel names"));
            }
            return Self::from_channels(channel_names, Vec::new(), sampling_rate);
        }

        if interleaved.len() % channel_count != 0 {
            return Err(signal_error!(
                "{} interleaved values do not divide into {} channels",
                interleaved.len(),
                channel_count
            ));
        }

        let samples = interleaved.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(samples); channel_count];
        for frame in interleaved.chunks_exact(channel_count) {
            for (channel, &value) in channels.iter_mut().zip(frame) {
                channel.push(value);
            }
        }

        Self::from_channels(channel_names, channels, sampling_rate)
    }

    /// Attach a wall-clock start time
    pub fn with_start_time(mut self, start_time: Option<NaiveTime>) -> Self {
        self.start_time = start_time;
        self
    }

    /// Validate sampling rate (finite, strictly positive)
    pub fn validate_sampling_rate(rate: f64) -> EegResult<()> {
        if rate.is_finite() && rate > 0.0 {
            Ok(())
        } else {
            Err(signal_error!("sampling rate must be a positive finite number, got {}", rate))
        }
    }

    fn validate_channel_names(names: &[String]) -> EegResult<()> {
        let mut seen = HashSet::with_capacity(names.len());
        for name in names {
            if name.trim().is_empty() {
                return Err(signal_error!("channel names must not be empty"));
            }
            if !seen.insert(name.as_str()) {
                return Err(signal_error!("duplicate channel name '{}'", name));
            }
        }
        Ok(())
    }

    /// Number of samples per channel
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// True when there are no samples or no channels
    pub fn is_empty(&self) -> bool {
        self.len() == 0 || self.channels.is_empty()
    }

    /// Total channel × sample cells
    pub fn cell_count(&self) -> usize {
        self.len() * self.channel_count()
    }

    /// Number of missing (`NaN`) cells
    pub fn missing_count(&self) -> usize {
        self.channels
            .iter()
            .map(|c| c.iter().filter(|v| v.is_nan()).count())
            .sum()
    }

    /// Get channel count
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Get sampling rate in Hz
    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    /// Ordered channel names
    pub fn channel_names(&self) -> &[String] {
        &self.channel_names
    }

    /// Wall-clock time of the first sample, if known
    pub fn start_time(&self) -> Option<NaiveTime> {
        self.start_time
    }

    /// Signal duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.len() as f64 / self.sampling_rate
    }

    /// Samples of one channel by index
    pub fn channel(&self, index: usize) -> Option<&[f64]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Samples of one channel by name
    pub fn channel_by_name(&self, name: &str) -> Option<&[f64]> {
        let index = self.channel_names.iter().position(|n| n == name)?;
        self.channel(index)
    }

    /// All channels, in channel-name order
    pub fn channels(&self) -> &[Vec<f64>] {
        &self.channels
    }

    /// Values of every channel at one sample index (one row of the time-major view)
    pub fn frame(&self, sample_index: usize) -> Option<Vec<f64>> {
        if sample_index >= self.len() {
            return None;
        }
        Some(self.channels.iter().map(|c| c[sample_index]).collect())
    }

    /// Independent copy of samples `[start, end)`; bounds are clamped to the signal
    pub fn slice(&self, start: usize, end: usize) -> MultiChannelSignal {
        let end = end.min(self.len());
        let start = start.min(end);
        MultiChannelSignal {
            sampling_rate: self.sampling_rate,
            channel_names: self.channel_names.clone(),
            channels: self.channels.iter().map(|c| c[start..end].to_vec()).collect(),
            start_time: None,
        }
    }

    /// Consume the signal, returning channel names and per-channel samples
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<f64>>) {
        (self.channel_names, self.channels)
    }

    /// Basic statistics for a channel
    pub fn channel_stats(&self, index: usize) -> Option<ChannelStats> {
        self.channel(index).map(ChannelStats::calculate)
    }
}

/// Basic statistics over the present (non-`NaN`) samples of a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub present: usize,
    pub missing: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub peak_to_peak: f64,
}

impl ChannelStats {
    pub fn calculate(data: &[f64]) -> Self {
        let present: Vec<f64> = data.iter().copied().filter(|v| !v.is_nan()).collect();
        let missing = data.len() - present.len();

        if present.is_empty() {
            return Self {
                present: 0,
                missing,
                mean: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                peak_to_peak: 0.0,
            };
        }

        let n = present.len() as f64;
        let mean = present.iter().sum::<f64>() / n;
        let variance = present.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        let min = present.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = present.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

        Self {
            present: present.len(),
            missing,
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
            peak_to_peak: max - min,
        }
    }
}
