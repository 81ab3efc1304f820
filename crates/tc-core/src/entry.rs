//! Time entries and their validated, pushable form.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::EntryId;

/// The entry's duration could not be anchored to a start time.
///
/// The timeclock records check-in/check-out pairs, so every entry must be
/// expressible as a start time plus a number of hours. Bare hour counts are
/// rejected at ingestion, before any push is attempted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("entry {id} has a bare hour duration; a start time is required to compute a time range")]
pub struct UnsupportedDurationFormat {
    /// The entry that was rejected.
    pub id: EntryId,
}

/// How an entry's duration was expressed by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryDuration {
    /// A start time-of-day plus a fractional hour count.
    Timed {
        /// When the entry begins.
        start: NaiveTime,
        /// Length in hours; fractions allowed.
        hours: f64,
    },
    /// A bare hour count with no derivable start instant.
    Hours(f64),
}

/// A time entry as supplied by the caller, not yet validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identity used to attribute push failures.
    pub id: EntryId,
    /// The entry's duration.
    pub duration: EntryDuration,
}

/// An entry whose duration is anchored to a start time.
///
/// This is the only form the store buffers; converting from [`Entry`] is the
/// ingestion-time validation gate.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEntry {
    /// Stable identity used to attribute push failures.
    pub id: EntryId,
    /// Start time-of-day.
    pub start: NaiveTime,
    /// Length in hours; fractions allowed.
    pub hours: f64,
}

impl TimedEntry {
    /// The entry's length in whole seconds, truncated toward zero.
    ///
    /// Truncation matters: adjacency is decided by comparing a computed end
    /// instant against the next entry's start, so sub-second fractions are
    /// dropped rather than rounded.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "truncation toward zero is the defined rounding rule"
    )]
    pub fn duration_secs(&self) -> i64 {
        (self.hours * 3600.0) as i64
    }

    /// The entry's start anchored to a calendar date.
    pub fn start_instant(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.start)
    }
}

impl TryFrom<Entry> for TimedEntry {
    type Error = UnsupportedDurationFormat;

    fn try_from(entry: Entry) -> Result<Self, Self::Error> {
        match entry.duration {
            EntryDuration::Timed { start, hours } => Ok(Self {
                id: entry.id,
                start,
                hours,
            }),
            EntryDuration::Hours(_) => Err(UnsupportedDurationFormat { id: entry.id }),
        }
    }
}
