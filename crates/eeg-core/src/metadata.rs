//! Recording metadata supplied alongside a signal by the ingestion layer

use crate::error::EegResult;
use crate::timestamp::TimeIndexer;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Typed recording metadata
///
/// Only `start_time` is interpreted by this framework. Everything else the
/// loader knows about the recording travels in `fields` untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    /// Recording start as `HH:MM:SS`
    #[serde(default)]
    pub start_time: Option<String>,
    /// Free-form loader fields (record name, hospital, ...)
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl RecordingMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata carrying only a start time
    pub fn with_start_time(start_time: impl Into<String>) -> Self {
        Self {
            start_time: Some(start_time.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Add a free-form field
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Look up a free-form field
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Parsed start time; `Ok(None)` when absent
    pub fn parsed_start_time(&self) -> EegResult<Option<NaiveTime>> {
        TimeIndexer::parse_optional_clock(self.start_time.as_deref())
    }
}
