//! Per-date buffering of entries awaiting a push pass.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::entry::{Entry, TimedEntry, UnsupportedDurationFormat};

/// Buffers entries grouped by calendar date until they are pushed.
///
/// Within a date, insertion order is preserved and significant: the merger
/// considers adjacency by array position, not by time order. The store is
/// built fresh per push pass rather than held as long-lived state, so
/// concurrent passes over different days cannot interfere.
#[derive(Debug, Default)]
pub struct EntryStore {
    buckets: BTreeMap<NaiveDate, Vec<TimedEntry>>,
}

impl EntryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entry` to the bucket for `date`, creating the bucket if absent.
    ///
    /// Rejects entries whose duration cannot be anchored to a start time;
    /// such entries never reach the merge pass. No side effect beyond
    /// buffering.
    pub fn add(&mut self, date: NaiveDate, entry: Entry) -> Result<(), UnsupportedDurationFormat> {
        let timed = TimedEntry::try_from(entry)?;
        self.buckets.entry(date).or_default().push(timed);
        Ok(())
    }

    /// True if no entries are buffered.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of buffered entries across all dates.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Consumes the store, yielding each date's entries in date order.
    pub fn into_buckets(self) -> impl Iterator<Item = (NaiveDate, Vec<TimedEntry>)> {
        self.buckets.into_iter()
    }
}
