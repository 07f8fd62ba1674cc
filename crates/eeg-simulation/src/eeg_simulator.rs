//! EEG signal simulator producing reproducible multi-channel recordings

use crate::signal_patterns::SignalPattern;
use eeg_core::{EegError, EegResult, MultiChannelSignal, TimeIndexer};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Standard 10-20 montage labels used when no names are configured
pub const DEFAULT_MONTAGE: [&str; 8] = ["Fp1", "Fp2", "F3", "F4", "C3", "C4", "O1", "O2"];

/// Configuration for EEG simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EegConfig {
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Channel names, one generated channel per name
    pub channel_names: Vec<String>,
    /// Deterministic rhythm content
    pub pattern: SignalPattern,
    /// Noise configuration
    pub noise: NoiseConfig,
    /// Power line interference (50/60Hz)
    pub powerline_freq: Option<f64>,
    /// Recording start as `HH:MM:SS`
    pub start_time: Option<String>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

/// Noise configuration for synthetic recordings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Gaussian noise standard deviation (0.0 = no noise)
    pub gaussian_std: f64,
    /// Baseline wander amplitude
    pub baseline_wander: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            gaussian_std: 8.0,
            baseline_wander: 0.0,
        }
    }
}

impl Default for EegConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 128.0,
            channel_names: montage(6),
            pattern: SignalPattern::resting(),
            noise: NoiseConfig::default(),
            powerline_freq: None,
            start_time: None,
            seed: None,
        }
    }
}

impl EegConfig {
    /// Zero-mean unit Gaussian noise on the given channels
    pub fn white_noise(sampling_rate: f64, channel_names: Vec<String>, seed: u64) -> Self {
        Self {
            sampling_rate,
            channel_names,
            pattern: SignalPattern::WhiteNoise,
            noise: NoiseConfig {
                gaussian_std: 1.0,
                baseline_wander: 0.0,
            },
            powerline_freq: None,
            start_time: None,
            seed: Some(seed),
        }
    }
}

/// First `count` montage labels, extended with numbered channels past the montage
pub fn montage(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            DEFAULT_MONTAGE
                .get(i)
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("Ch{}", i + 1))
        })
        .collect()
}

/// EEG signal simulator
pub struct EegSimulator {
    config: EegConfig,
    rng: rand::rngs::StdRng,
    normal_dist: Normal<f64>,
    time_offset: f64,
}

impl EegSimulator {
    /// Create new EEG simulator with configuration
    pub fn new(config: EegConfig) -> EegResult<Self> {
        Self::validate(&config)?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let rng = rand::rngs::StdRng::seed_from_u64(seed);
        let normal_dist = Normal::new(0.0, config.noise.gaussian_std).map_err(|e| EegError::Simulation {
            message: format!("Failed to create normal distribution: {}", e),
        })?;

        Ok(EegSimulator {
            config,
            rng,
            normal_dist,
            time_offset: 0.0,
        })
    }

    fn validate(config: &EegConfig) -> EegResult<()> {
        MultiChannelSignal::validate_sampling_rate(config.sampling_rate)?;

        if config.channel_names.is_empty() {
            return Err(EegError::Simulation {
                message: "at least one channel is required".to_string(),
            });
        }

        if let Some(start) = &config.start_time {
            TimeIndexer::parse_clock(start)?;
        }

        Ok(())
    }

    /// Generate `duration` seconds of signal, continuing from the previous call
    pub fn generate(&mut self, duration: f64) -> EegResult<MultiChannelSignal> {
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(EegError::Simulation {
                message: format!("duration must be a non-negative number, got {}", duration),
            });
        }

        let samples = (duration * self.config.sampling_rate).round() as usize;
        let dt = 1.0 / self.config.sampling_rate;
        let channel_count = self.config.channel_names.len();
        let mut channels = vec![Vec::with_capacity(samples); channel_count];

        for sample_idx in 0..samples {
            let time = self.time_offset + sample_idx as f64 * dt;

            for (channel_idx, channel) in channels.iter_mut().enumerate() {
                // slight phase offset per channel so montages are not identical
                let phase = channel_idx as f64 * 0.3;
                let mut value = self.config.pattern.value_at(time, phase);

                value += self.normal_dist.sample(&mut self.rng);
                value += self.config.noise.baseline_wander * (2.0 * std::f64::consts::PI * 0.1 * time).sin();

                if let Some(powerline_freq) = self.config.powerline_freq {
                    value += 2.0 * (2.0 * std::f64::consts::PI * powerline_freq * time).sin();
                }

                channel.push(value);
            }
        }

        let start_time = if self.time_offset == 0.0 {
            TimeIndexer::parse_optional_clock(self.config.start_time.as_deref())?
        } else {
            None
        };
        self.time_offset += samples as f64 * dt;

        Ok(MultiChannelSignal::from_channels(
            self.config.channel_names.clone(),
            channels,
            self.config.sampling_rate,
        )?
        .with_start_time(start_time))
    }

    /// Reset time offset (useful for restarting simulation)
    pub fn reset_time(&mut self) {
        self.time_offset = 0.0;
    }

    /// Get current configuration
    pub fn config(&self) -> &EegConfig {
        &self.config
    }
}
