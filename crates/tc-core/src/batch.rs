//! Push orchestration: merge, push, and aggregate failures.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::merge::merge_bucket;
use crate::store::EntryStore;
use crate::types::EntryId;

/// A single span's push failed; carries the human-readable cause.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PushError(String);

impl PushError {
    /// Creates a push error from a cause message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The cause message.
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// The outcome of a full push pass with at least one failed span.
///
/// Every entry that was a member of a failed span appears here with that
/// span's error string; entries from successful spans are absent. The map
/// is the sole failure artifact: there is no partial-success return value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub struct AggregateError {
    /// Per-entry failure causes, keyed by the caller-supplied identity.
    pub failures: BTreeMap<EntryId, String>,
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to push {} entries", self.failures.len())
    }
}

/// The outbound seam to the timeclock.
///
/// One call represents one check-in/check-out submission covering a merged
/// span. Implementations must not retry: a failed push is reported upward
/// once, and the caller decides what to do with it.
pub trait PushTransport {
    /// Submits one span starting at `start` and lasting `duration_secs`.
    fn push(&self, start: NaiveDateTime, duration_secs: i64) -> Result<(), PushError>;
}

/// Runs the full merge-and-push pass over a buffered store.
///
/// A single forward pass: dates in order, one merge per date, one push per
/// group. A failed push marks every member of its group with the same error
/// string and the pass continues with the remaining groups and dates.
pub fn push_all<T: PushTransport + ?Sized>(
    store: EntryStore,
    transport: &T,
) -> Result<(), AggregateError> {
    let mut failures: BTreeMap<EntryId, String> = BTreeMap::new();

    for (date, entries) in store.into_buckets() {
        for group in merge_bucket(date, &entries) {
            tracing::debug!(
                %date,
                start = %group.start,
                duration_secs = group.duration_secs,
                entries = group.entries.len(),
                "pushing merged span"
            );

            if let Err(err) = transport.push(group.start, group.duration_secs) {
                tracing::warn!(%date, start = %group.start, error = %err, "push failed");
                for entry in &group.entries {
                    failures.insert(entry.id.clone(), err.to_string());
                }
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(AggregateError { failures })
    }
}
