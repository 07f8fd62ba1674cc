//! Recording artifacts injected into synthetic signals
//!
//! Each artifact mimics a failure mode seen in real EEG: electrode dropouts
//! (missing samples), saturated or disconnected leads (flat runs), movement
//! spikes, and channels that never recorded anything.

use eeg_core::{signal_error, EegResult, MultiChannelSignal};
use serde::{Deserialize, Serialize};

/// One corruption applied to a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Artifact {
    /// `len` samples replaced by `NaN` starting at `start`
    Dropout { channel: usize, start: usize, len: usize },
    /// `len` samples held at `level`
    Flatline { channel: usize, start: usize, len: usize, level: f64 },
    /// Single-sample excursion of `amplitude` added at `at`
    Spike { channel: usize, at: usize, amplitude: f64 },
    /// Whole channel missing
    DeadChannel { channel: usize },
}

impl Artifact {
    fn channel(&self) -> usize {
        match self {
            Artifact::Dropout { channel, .. }
            | Artifact::Flatline { channel, .. }
            | Artifact::Spike { channel, .. }
            | Artifact::DeadChannel { channel } => *channel,
        }
    }

    fn apply(&self, samples: &mut [f64]) {
        let n = samples.len();
        match *self {
            Artifact::Dropout { start, len, .. } => {
                let end = start.saturating_add(len).min(n);
                for v in samples.iter_mut().take(end).skip(start) {
                    *v = f64::NAN;
                }
            }
            Artifact::Flatline { start, len, level, .. } => {
                let end = start.saturating_add(len).min(n);
                for v in samples.iter_mut().take(end).skip(start) {
                    *v = level;
                }
            }
            Artifact::Spike { at, amplitude, .. } => {
                if let Some(v) = samples.get_mut(at) {
                    *v += amplitude;
                }
            }
            Artifact::DeadChannel { .. } => samples.fill(f64::NAN),
        }
    }
}

/// Apply artifacts in order; sample ranges past the end are clipped
pub fn apply_artifacts(signal: MultiChannelSignal, artifacts: &[Artifact]) -> EegResult<MultiChannelSignal> {
    let sampling_rate = signal.sampling_rate();
    let start_time = signal.start_time();
    let (names, mut channels) = signal.into_parts();

    for artifact in artifacts {
        let index = artifact.channel();
        let samples = channels.get_mut(index).ok_or_else(|| {
            signal_error!("artifact targets channel {} but the signal has {}", index, names.len())
        })?;
        artifact.apply(samples);
    }

    Ok(MultiChannelSignal::from_channels(names, channels, sampling_rate)?.with_start_time(start_time))
}
