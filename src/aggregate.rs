//! Grouping of stored events into per-day tables.
//!
//! Cancelled events are dropped here, at read time, so the CSV stores keep
//! everything that was scraped. Groups keep the order records were read in;
//! sorting by start time is left to the page itself.

use crate::error::Result;
use crate::models::EventRecord;
use crate::outputs::html::render_day;
use itertools::Itertools;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Records grouped by day; `None` is the unknown-day bucket.
pub type DayGroups = BTreeMap<Option<u8>, Vec<EventRecord>>;

/// One rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDay {
    pub day: u8,
    pub event_count: usize,
    pub html: String,
}

pub fn filter_cancelled(records: impl IntoIterator<Item = EventRecord>) -> impl Iterator<Item = EventRecord> {
    records.into_iter().filter(|r| !r.cancelled)
}

/// Stable grouping by day.
pub fn group_by_day(records: impl IntoIterator<Item = EventRecord>) -> DayGroups {
    records
        .into_iter()
        .into_group_map_by(|r| r.day)
        .into_iter()
        .collect()
}

/// Drop cancelled records, then group the rest.
pub fn active_groups(records: impl IntoIterator<Item = EventRecord>) -> DayGroups {
    group_by_day(filter_cancelled(records))
}

/// Render one page per entry of `days`; a day with no events renders an empty table.
#[instrument(level = "info", skip(groups, last_updated_time))]
pub fn render_by_day(
    groups: &DayGroups,
    days: &[u8],
    last_updated_time: &str,
    title_max_len: usize,
) -> Result<Vec<RenderedDay>> {
    if let Some(unknown) = groups.get(&None) {
        debug!(count = unknown.len(), "Events with unknown day are not rendered");
    }

    days.iter()
        .map(|&day| {
            let events = groups.get(&Some(day)).map(Vec::as_slice).unwrap_or(&[]);
            let html = render_day(day, days, events, last_updated_time, title_max_len)?;
            info!(day, events = events.len(), bytes = html.len(), "Rendered day");
            Ok(RenderedDay {
                day,
                event_count: events.len(),
                html,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::record;

    fn titles(events: &[EventRecord]) -> Vec<&str> {
        events.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_grouping_is_stable() {
        let groups = group_by_day(vec![
            record(Some(1), "A"),
            record(Some(2), "B"),
            record(Some(1), "C"),
        ]);
        assert_eq!(titles(&groups[&Some(1)]), vec!["A", "C"]);
        assert_eq!(titles(&groups[&Some(2)]), vec!["B"]);
    }

    #[test]
    fn test_grouping_does_not_sort_by_time() {
        let mut late = record(Some(1), "Late");
        late.start_code = "2000".to_string();
        let early = record(Some(1), "Early");
        let groups = group_by_day(vec![late, early]);
        assert_eq!(titles(&groups[&Some(1)]), vec!["Late", "Early"]);
    }

    #[test]
    fn test_unknown_day_bucket() {
        let groups = group_by_day(vec![record(None, "Lost"), record(Some(3), "Found")]);
        assert_eq!(titles(&groups[&None]), vec!["Lost"]);
        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec![None, Some(3)]);
    }

    #[test]
    fn test_cancelled_records_are_dropped() {
        let mut cancelled = record(Some(1), "CANCELED - Meetup");
        cancelled.cancelled = true;
        let groups = active_groups(vec![record(Some(1), "Keep"), cancelled]);
        assert_eq!(titles(&groups[&Some(1)]), vec!["Keep"]);
    }

    #[test]
    fn test_render_excludes_cancelled() {
        let mut cancelled = record(Some(1), "Dropped Panel");
        cancelled.cancelled = true;
        let groups = active_groups(vec![record(Some(1), "Kept Panel"), cancelled]);

        let pages = render_by_day(&groups, &[1], "2024-07-04 09:00", 60).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].event_count, 1);
        assert!(pages[0].html.contains("Kept Panel"));
        assert!(!pages[0].html.contains("Dropped Panel"));
    }

    #[test]
    fn test_render_missing_day_is_empty_not_error() {
        let groups = group_by_day(vec![record(Some(1), "Only Day One")]);
        let pages = render_by_day(&groups, &[1, 2, 3, 4], "2024-07-04 09:00", 60).unwrap();
        let days: Vec<_> = pages.iter().map(|p| p.day).collect();
        assert_eq!(days, vec![1, 2, 3, 4]);
        assert_eq!(pages[1].event_count, 0);
        assert!(!pages[1].html.contains("Only Day One"));
        assert!(pages[1].html.contains("2024-07-04 09:00"));
    }
}
