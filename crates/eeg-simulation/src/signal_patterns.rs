//! Pre-defined EEG rhythm patterns for synthetic recordings

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// One sinusoidal rhythm component (µV amplitude at a fixed frequency)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rhythm {
    pub frequency: f64,
    pub amplitude: f64,
}

/// Deterministic part of a synthetic EEG channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignalPattern {
    /// No deterministic content: the channel is pure noise
    WhiteNoise,
    /// Constant level (useful for flatline fixtures)
    Constant { level: f64 },
    /// Sum of band rhythms
    Rhythms { components: Vec<Rhythm> },
}

impl SignalPattern {
    /// Relaxed, eyes-closed recording dominated by alpha
    pub fn resting() -> Self {
        SignalPattern::Rhythms {
            components: vec![
                Rhythm { frequency: 2.0, amplitude: 25.0 },
                Rhythm { frequency: 6.0, amplitude: 20.0 },
                Rhythm { frequency: 10.0, amplitude: 35.0 },
                Rhythm { frequency: 18.0, amplitude: 15.0 },
                Rhythm { frequency: 35.0, amplitude: 8.0 },
            ],
        }
    }

    /// Drowsy recording with theta/delta dominance
    pub fn drowsy() -> Self {
        SignalPattern::Rhythms {
            components: vec![
                Rhythm { frequency: 1.5, amplitude: 40.0 },
                Rhythm { frequency: 5.0, amplitude: 30.0 },
                Rhythm { frequency: 10.0, amplitude: 10.0 },
            ],
        }
    }

    /// Alert recording with beta activity
    pub fn alert() -> Self {
        SignalPattern::Rhythms {
            components: vec![
                Rhythm { frequency: 10.0, amplitude: 10.0 },
                Rhythm { frequency: 20.0, amplitude: 20.0 },
                Rhythm { frequency: 35.0, amplitude: 8.0 },
            ],
        }
    }

    /// Deterministic value at `time` seconds; `phase` offsets each channel
    pub fn value_at(&self, time: f64, phase: f64) -> f64 {
        match self {
            SignalPattern::WhiteNoise => 0.0,
            SignalPattern::Constant { level } => *level,
            SignalPattern::Rhythms { components } => components
                .iter()
                .map(|r| r.amplitude * (2.0 * PI * r.frequency * time + phase).sin())
                .sum(),
        }
    }

    /// Get pattern description
    pub fn description(&self) -> &'static str {
        match self {
            SignalPattern::WhiteNoise => "White noise",
            SignalPattern::Constant { .. } => "Constant level",
            SignalPattern::Rhythms { .. } => "Band rhythms",
        }
    }

    /// Create common preset patterns
    pub fn presets() -> Vec<(&'static str, SignalPattern)> {
        vec![
            ("Noise", SignalPattern::WhiteNoise),
            ("Resting", SignalPattern::resting()),
            ("Drowsy", SignalPattern::drowsy()),
            ("Alert", SignalPattern::alert()),
        ]
    }

    /// Look up a preset by case-insensitive name
    pub fn preset(name: &str) -> Option<SignalPattern> {
        Self::presets()
            .into_iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
            .map(|(_, pattern)| pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_values() {
        assert_eq!(SignalPattern::WhiteNoise.value_at(1.3, 0.0), 0.0);
        assert_eq!(SignalPattern::Constant { level: 4.0 }.value_at(9.0, 1.0), 4.0);

        let single = SignalPattern::Rhythms {
            components: vec![Rhythm { frequency: 1.0, amplitude: 2.0 }],
        };
        assert!((single.value_at(0.25, 0.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(SignalPattern::preset("resting"), Some(SignalPattern::resting()));
        assert!(SignalPattern::preset("unknown").is_none());
        assert_eq!(SignalPattern::presets().len(), 4);
    }
}
