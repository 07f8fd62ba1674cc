//! Epochs and epoch tables
//!
//! An [`Epoch`] owns an independent copy of its slice of the parent signal.
//! An [`EpochTable`] is the ordered output of one extraction run and offers
//! both per-epoch records and a flattened long view keyed by `epoch_id`.

use crate::signal::MultiChannelSignal;
use chrono::NaiveTime;
use serde::Serialize;
use uuid::Uuid;

/// Fixed-length window cut from a multi-channel signal
///
/// Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Epoch {
    epoch_id: u64,
    start_offset: usize,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    truncated: bool,
    data: MultiChannelSignal,
}

impl Epoch {
    pub fn new(epoch_id: u64, start_offset: usize, data: MultiChannelSignal) -> Self {
        Self {
            epoch_id,
            start_offset,
            start_time: None,
            end_time: None,
            truncated: false,
            data,
        }
    }

    /// Stamp wall-clock boundaries
    pub fn with_times(mut self, start_time: Option<NaiveTime>, end_time: Option<NaiveTime>) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self.data = self.data.with_start_time(start_time);
        self
    }

    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    /// Sequential id, unique within one extraction run
    pub fn epoch_id(&self) -> u64 {
        self.epoch_id
    }

    /// Offset of the first sample within the parent signal
    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    /// Wall-clock time of the first sample
    pub fn start_time(&self) -> Option<NaiveTime> {
        self.start_time
    }

    /// Wall-clock time just after the last sample
    pub fn end_time(&self) -> Option<NaiveTime> {
        self.end_time
    }

    /// Shorter than the nominal epoch length (retained tail)
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Copied samples
    pub fn data(&self) -> &MultiChannelSignal {
        &self.data
    }

    /// Samples per channel
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Offset one past the last sample within the parent signal
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.len()
    }

    /// Duration in seconds at the epoch's sampling rate
    pub fn duration_secs(&self) -> f64 {
        self.data.duration_secs()
    }
}

/// One sample of the long view: a time-major row tagged with its epoch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRow {
    pub epoch_id: u64,
    /// Sample index within the epoch
    pub sample_index: usize,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// One value per channel, in channel-name order
    pub values: Vec<f64>,
}

/// Ordered epochs of one extraction run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpochTable {
    run_id: Uuid,
    channel_names: Vec<String>,
    epochs: Vec<Epoch>,
}

impl EpochTable {
    pub fn new(channel_names: Vec<String>, epochs: Vec<Epoch>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            channel_names,
            epochs,
        }
    }

    /// Identifier of the extraction run that produced this table
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Channel columns of the long view
    pub fn channel_names(&self) -> &[String] {
        &self.channel_names
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    /// Epochs in extraction order
    pub fn epochs(&self) -> &[Epoch] {
        &self.epochs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Epoch> {
        self.epochs.iter()
    }

    /// Per-epoch record access
    pub fn get(&self, epoch_id: u64) -> Option<&Epoch> {
        // ids are assigned sequentially, so the index is usually the id
        match self.epochs.get(epoch_id as usize) {
            Some(epoch) if epoch.epoch_id == epoch_id => Some(epoch),
            _ => self.epochs.iter().find(|e| e.epoch_id == epoch_id),
        }
    }

    /// Ids in extraction order
    pub fn epoch_ids(&self) -> Vec<u64> {
        self.epochs.iter().map(|e| e.epoch_id).collect()
    }

    /// Total samples per channel over all epochs
    pub fn total_samples(&self) -> usize {
        self.epochs.iter().map(Epoch::len).sum()
    }

    /// Flattened long view: one row per sample, tagged with its epoch
    pub fn long_rows(&self) -> impl Iterator<Item = LongRow> + '_ {
        self.epochs.iter().flat_map(|epoch| {
            (0..epoch.len()).filter_map(move |sample_index| {
                epoch.data.frame(sample_index).map(|values| LongRow {
                    epoch_id: epoch.epoch_id,
                    sample_index,
                    start_time: epoch.start_time,
                    end_time: epoch.end_time,
                    values,
                })
            })
        })
    }

    pub fn into_epochs(self) -> Vec<Epoch> {
        self.epochs
    }
}

impl<'a> IntoIterator for &'a EpochTable {
    type Item = &'a Epoch;
    type IntoIter = std::slice::Iter<'a, Epoch>;

    fn into_iter(self) -> Self::IntoIter {
        self.epochs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> EpochTable {
        let names = vec!["Fp1".to_string(), "Fp2".to_string()];
        let parent = MultiChannelSignal::from_channels(
            names.clone(),
            vec![(0..6).map(|i| i as f64).collect(), (0..6).map(|i| -(i as f64)).collect()],
            2.0,
        )
        .unwrap();

        let start = NaiveTime::from_hms_opt(9, 0, 0);
        let epochs = vec![
            Epoch::new(0, 0, parent.slice(0, 4)).with_times(start, NaiveTime::from_hms_opt(9, 0, 2)),
            Epoch::new(1, 4, parent.slice(4, 6))
                .with_times(NaiveTime::from_hms_opt(9, 0, 2), NaiveTime::from_hms_opt(9, 0, 3))
                .with_truncated(true),
        ];
        EpochTable::new(names, epochs)
    }

    #[test]
    fn test_record_access() {
        let table = table();
        assert_eq!(table.len(), 2);
        assert_eq!(table.epoch_ids(), vec![0, 1]);
        assert_eq!(table.total_samples(), 6);

        let second = table.get(1).unwrap();
        assert_eq!(second.start_offset(), 4);
        assert_eq!(second.end_offset(), 6);
        assert!(second.is_truncated());
        assert_eq!(second.data().start_time(), NaiveTime::from_hms_opt(9, 0, 2));
        assert_eq!(second.start_time(), second.data().start_time());
        assert!(table.get(7).is_none());
    }

    #[test]
    fn test_long_rows() {
        let table = table();
        let rows: Vec<LongRow> = table.long_rows().collect();

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].epoch_id, 0);
        assert_eq!(rows[0].values, vec![0.0, 0.0]);
        assert_eq!(rows[4].epoch_id, 1);
        assert_eq!(rows[4].sample_index, 0);
        assert_eq!(rows[4].values, vec![4.0, -4.0]);
        assert_eq!(rows[5].end_time, NaiveTime::from_hms_opt(9, 0, 3));
    }

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(table().run_id(), table().run_id());
    }
}
