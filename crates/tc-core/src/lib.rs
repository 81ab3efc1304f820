//! Core domain logic for the Tipee timeclock pusher.
//!
//! This crate contains the fundamental types and logic for:
//! - Buffering: collecting validated time entries per calendar date
//! - Merging: fusing back-to-back entries into minimal reportable spans
//! - Pushing: submitting each span once and aggregating per-entry failures

pub mod batch;
pub mod entry;
pub mod merge;
pub mod project;
pub mod store;
pub mod types;

pub use batch::{AggregateError, PushError, PushTransport, push_all};
pub use entry::{Entry, EntryDuration, TimedEntry, UnsupportedDurationFormat};
pub use merge::{MergeGroup, merge_bucket};
pub use project::{Activity, Project, available_projects};
pub use store::EntryStore;
pub use types::{EntryId, ValidationError};
