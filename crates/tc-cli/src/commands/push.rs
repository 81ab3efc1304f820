//! Push command: read entries from a file, merge, and push.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use tc_api::TipeeClient;
use tc_core::{Entry, EntryDuration, EntryId, EntryStore, PushTransport};

use crate::Config;

/// One entry as it appears in the input file.
#[derive(Debug, Deserialize)]
pub struct EntryRecord {
    pub id: EntryId,
    pub date: NaiveDate,
    /// Start time-of-day (`HH:MM:SS`). Records without one are rejected at
    /// ingestion: the timeclock needs a derivable time range.
    #[serde(default)]
    pub start: Option<NaiveTime>,
    pub hours: f64,
}

/// Outcome of a push pass over one input file.
#[derive(Debug)]
pub struct PushReport {
    /// Number of records read from the file.
    pub total: usize,
    /// Entries rejected at ingestion or failed during push, with causes.
    pub failures: BTreeMap<EntryId, String>,
}

impl PushReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary, one line per failed entry.
    pub fn render(&self) -> String {
        let pushed = self.total - self.failures.len();
        if self.is_success() {
            return format!("pushed {pushed} entries");
        }

        let mut out = format!("pushed {pushed} of {} entries\nfailed entries:", self.total);
        for (id, cause) in &self.failures {
            // Infallible for String targets.
            let _ = write!(out, "\n  {id}: {cause}");
        }
        out
    }
}

pub fn run(file: &Path, config: &Config) -> Result<()> {
    let records = load_entries(file)?;
    anyhow::ensure!(
        config.person > 0,
        "no person configured; set `person` in the config file or TC_PERSON"
    );

    let client = TipeeClient::new(config.endpoint(), config.credentials(), config.person)
        .context("failed to build Tipee client")?;

    let report = push_records(records, &client);
    println!("{}", report.render());

    if report.is_success() {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "{} of {} entries were not pushed",
            report.failures.len(),
            report.total
        ))
    }
}

/// Reads and parses the entries file.
fn load_entries(path: &Path) -> Result<Vec<EntryRecord>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

/// Buffers records, runs the merge-and-push pass, and collects failures.
///
/// Ingestion rejections and push failures land in the same per-entry map:
/// a bare-hours record is fatal for that record only, and the rest of the
/// file is still pushed.
fn push_records<T: PushTransport + ?Sized>(records: Vec<EntryRecord>, transport: &T) -> PushReport {
    let total = records.len();
    let mut store = EntryStore::new();
    let mut failures: BTreeMap<EntryId, String> = BTreeMap::new();

    for record in records {
        let duration = match record.start {
            Some(start) => EntryDuration::Timed {
                start,
                hours: record.hours,
            },
            None => EntryDuration::Hours(record.hours),
        };
        let entry = Entry {
            id: record.id,
            duration,
        };
        if let Err(err) = store.add(record.date, entry) {
            tracing::warn!(entry = %err.id, "entry rejected at ingestion");
            failures.insert(err.id.clone(), err.to_string());
        }
    }

    if let Err(err) = tc_core::push_all(store, transport) {
        failures.extend(err.failures);
    }

    PushReport { total, failures }
}
