//! Contiguity merging of same-day entries into minimal spans.
//!
//! The timeclock models attendance as check-in/check-out pairs, so a run of
//! back-to-back entries must be reported as one span rather than several.
//! Entries are scanned in stored order and greedily fused whenever the next
//! entry's start instant lines up with the running end of the current group.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::entry::TimedEntry;

const SECS_PER_DAY: i64 = 86_400;

/// A run of contiguous entries collapsed into one reportable span.
///
/// Constructed fresh per merge pass and consumed immediately by the push
/// loop; members are borrowed so failures can be attributed back to the
/// original entries.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeGroup<'a> {
    /// Start instant of the first member.
    pub start: NaiveDateTime,
    /// Sum of member durations in whole seconds.
    pub duration_secs: i64,
    /// The member entries, in stored order.
    pub entries: Vec<&'a TimedEntry>,
}

impl MergeGroup<'_> {
    /// End instant of the span.
    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::seconds(self.duration_secs)
    }
}

/// Groups one date's entries into contiguous spans.
///
/// Entries are processed by index in stored order; each unabsorbed entry
/// heads a new group and absorbs successors for as long as the chain of
/// computed ends matches the successors' start instants. Every entry ends up
/// in exactly one group, either as a head or absorbed.
pub fn merge_bucket(date: NaiveDate, entries: &[TimedEntry]) -> Vec<MergeGroup<'_>> {
    let mut groups = Vec::new();
    let mut absorbed = vec![false; entries.len()];

    for (index, head) in entries.iter().enumerate() {
        if absorbed[index] {
            continue;
        }

        let start = head.start_instant(date);
        let mut duration_secs = head.duration_secs();
        let mut members = vec![head];
        let mut next_index = index + 1;

        while let Some(candidate) = entries.get(next_index) {
            let end = start + Duration::seconds(duration_secs);
            let next_start = candidate.start_instant(date);

            // Only the sub-day seconds component of the delta is compared, so
            // a candidate that starts a whole number of days before the
            // computed end still reads as contiguous. Known quirk, kept
            // as-is; see `backward_start_across_midnight_still_merges`.
            let gap = (next_start - end).num_seconds().rem_euclid(SECS_PER_DAY);
            if gap > 0 {
                break;
            }

            absorbed[next_index] = true;
            members.push(candidate);
            duration_secs += candidate.duration_secs();
            next_index += 1;
        }

        tracing::trace!(
            start = %start,
            duration_secs,
            members = members.len(),
            "closed merge group"
        );
        groups.push(MergeGroup {
            start,
            duration_secs,
            entries: members,
        });
    }

    groups
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::types::EntryId;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn entry(id: &str, hour: u32, minute: u32, hours: f64) -> TimedEntry {
        TimedEntry {
            id: EntryId::new(id).unwrap(),
            start: NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
            hours,
        }
    }

    fn ids<'a>(group: &'a MergeGroup<'a>) -> Vec<&'a str> {
        group.entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn adjacent_entries_merge_into_one_span() {
        // 09:00 (1h) + 10:00 (1h) -> one span 09:00-11:00
        let entries = vec![entry("a", 9, 0, 1.0), entry("b", 10, 0, 1.0)];
        let groups = merge_bucket(date(), &entries);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].start.to_string(), "2025-03-03 09:00:00");
        assert_eq!(groups[0].duration_secs, 7200);
        assert_eq!(groups[0].end().to_string(), "2025-03-03 11:00:00");
        assert_eq!(ids(&groups[0]), ["a", "b"]);
    }

    #[test]
    fn gap_breaks_the_chain() {
        // 09:00 (1h) + 10:15 (1h) -> two separate spans
        let entries = vec![entry("a", 9, 0, 1.0), entry("b", 10, 15, 1.0)];
        let groups = merge_bucket(date(), &entries);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].duration_secs, 3600);
        assert_eq!(groups[1].start.to_string(), "2025-03-03 10:15:00");
        assert_eq!(groups[1].duration_secs, 3600);
    }

    #[test]
    fn chains_of_three_merge_like_pairs() {
        // Merging is associative: a three-entry chain yields the same span
        // as merging the first two and then the third.
        let entries = vec![
            entry("a", 9, 0, 1.0),
            entry("b", 10, 0, 0.5),
            entry("c", 10, 30, 1.5),
        ];
        let groups = merge_bucket(date(), &entries);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].start.to_string(), "2025-03-03 09:00:00");
        assert_eq!(groups[0].duration_secs, 3 * 3600);

        let first_two = vec![entry("a", 9, 0, 1.0), entry("b", 10, 0, 0.5)];
        let partial = merge_bucket(date(), &first_two);
        assert_eq!(partial[0].duration_secs, 5400);
        assert_eq!(partial[0].end().to_string(), "2025-03-03 10:30:00");
    }

    #[test]
    fn every_entry_lands_in_exactly_one_group() {
        let entries = vec![
            entry("a", 9, 0, 1.0),
            entry("b", 10, 0, 1.0),
            entry("c", 14, 0, 0.5),
            entry("d", 14, 30, 0.5),
            entry("e", 17, 0, 1.0),
        ];
        let groups = merge_bucket(date(), &entries);

        assert_eq!(groups.len(), 3);
        let all: Vec<_> = groups.iter().flat_map(ids).collect();
        assert_eq!(all, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn adjacency_is_positional_not_temporal() {
        // "b" at 10:00 would chain onto "a", but it sits after the
        // non-adjacent "x" in the stored order, so no merge happens.
        let entries = vec![
            entry("a", 9, 0, 1.0),
            entry("x", 14, 0, 1.0),
            entry("b", 10, 0, 1.0),
        ];
        let groups = merge_bucket(date(), &entries);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn sub_second_truncation_affects_boundary_matching() {
        // 0.9999h truncates to 3599s, so the computed end is 09:59:59 and
        // the 10:00 entry is one second away: no merge.
        let entries = vec![entry("a", 9, 0, 0.9999), entry("b", 10, 0, 1.0)];
        let groups = merge_bucket(date(), &entries);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn empty_bucket_yields_no_groups() {
        let groups = merge_bucket(date(), &[]);
        assert!(groups.is_empty());
    }

    #[test]
    fn single_entry_is_its_own_group() {
        let entries = vec![entry("solo", 9, 0, 2.0)];
        let groups = merge_bucket(date(), &entries);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].duration_secs, 7200);
        assert_eq!(ids(&groups[0]), ["solo"]);
    }

    #[test]
    fn backward_start_across_midnight_still_merges() {
        // Known quirk: the adjacency test keeps only the sub-day seconds
        // component of the delta. An entry at 23:00 for 2h computes an end
        // of 01:00 the next day; a following entry at 01:00 on the *same*
        // date starts exactly one day earlier, the remainder reads zero,
        // and the two merge even though the second starts before the first
        // ends. Do not "fix" without a product decision.
        let entries = vec![entry("late", 23, 0, 2.0), entry("wrap", 1, 0, 1.0)];
        let groups = merge_bucket(date(), &entries);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].duration_secs, 3 * 3600);
        assert_eq!(ids(&groups[0]), ["late", "wrap"]);
    }

    #[test]
    fn overlap_short_of_a_day_breaks_the_chain() {
        // An ordinary overlap (next start 30 minutes before the computed
        // end) leaves a large positive sub-day remainder and does not merge.
        let entries = vec![entry("a", 9, 0, 2.0), entry("b", 10, 30, 1.0)];
        let groups = merge_bucket(date(), &entries);
        assert_eq!(groups.len(), 2);
    }
}
