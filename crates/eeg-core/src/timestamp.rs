//! Wall-clock stamping for sample offsets
//!
//! Recordings carry an optional time-of-day start (`HH:MM:SS`). Epoch
//! boundaries are stamped by adding `offset / sampling_rate` seconds to it.
//! Crossing midnight is not modelled: such stamps come back as `None`.

use crate::error::{EegError, EegResult};
use chrono::{Duration, NaiveTime};

/// Format accepted for recording start times
pub const CLOCK_FORMAT: &str = "%H:%M:%S";

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Stateless converter from sample offsets to wall-clock times
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeIndexer;

impl TimeIndexer {
    /// Parse a `HH:MM:SS` time of day
    pub fn parse_clock(text: &str) -> EegResult<NaiveTime> {
        let trimmed = text.trim();
        NaiveTime::parse_from_str(trimmed, CLOCK_FORMAT).map_err(|e| EegError::InvalidTimestamp {
            value: trimmed.to_string(),
            reason: e.to_string(),
        })
    }

    /// Parse an optional `HH:MM:SS` string, passing `None` through
    pub fn parse_optional_clock(text: Option<&str>) -> EegResult<Option<NaiveTime>> {
        text.map(Self::parse_clock).transpose()
    }

    /// Wall-clock time of `offset` samples after `start`
    ///
    /// Returns `None` when no start is known, when the sampling rate is not
    /// a positive finite number, or when the result would wrap past midnight.
    pub fn timestamp_at(start: Option<NaiveTime>, offset: usize, sampling_rate: f64) -> Option<NaiveTime> {
        let start = start?;
        let seconds = Self::offset_seconds(offset, sampling_rate)?;
        let nanos = (seconds * NANOS_PER_SEC).round();
        if nanos > i64::MAX as f64 {
            return None;
        }

        let (stamped, wrapped) = start.overflowing_add_signed(Duration::nanoseconds(nanos as i64));
        if wrapped != 0 {
            None
        } else {
            Some(stamped)
        }
    }

    /// Seconds elapsed after `offset` samples
    pub fn offset_seconds(offset: usize, sampling_rate: f64) -> Option<f64> {
        if sampling_rate.is_finite() && sampling_rate > 0.0 {
            Some(offset as f64 / sampling_rate)
        } else {
            None
        }
    }
}
