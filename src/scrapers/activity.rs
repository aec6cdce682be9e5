//! Activity listing scraper.
//!
//! Secondary pages (dance hall, lounges, beer garden) list one room's events
//! as plain paragraphs:
//!
//! ```text
//! Day 1 - July 4
//! 10:00 AM - 11:30 AM - Open Dance
//! 12:00PM - 1:00PM - Idol Workshop
//!
//! Day 2 - July 5
//! ...
//! ```
//!
//! A header line sets the current day for every entry that follows it until
//! the next header. Entries seen before any header get no day.

use super::{RawEvent, build_record};
use crate::config::Tables;
use crate::error::{Result, ScheduleError};
use crate::models::EventRecord;
use crate::utils::{squash_whitespace, truncate_for_log};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, trace};

static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{1,2}:\d{2}\s?[AaPp][Mm])\s*[-–]\s*(\d{1,2}:\d{2}\s?[AaPp][Mm])\s*[-–]\s*(.+)$",
    )
    .expect("static regex is valid")
});

/// One listing line, classified.
#[derive(Debug, PartialEq, Eq)]
pub enum ActivityLine<'a> {
    DayHeader(u8),
    Entry {
        start: &'a str,
        end: &'a str,
        title: &'a str,
    },
    Other,
}

/// Classify a whitespace-normalized line.
pub fn classify<'a>(line: &'a str, tables: &Tables) -> ActivityLine<'a> {
    if let Some(day) = tables.day(line) {
        return ActivityLine::DayHeader(day);
    }
    match ENTRY.captures(line) {
        Some(caps) => match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(start), Some(end), Some(title)) => ActivityLine::Entry {
                start: start.as_str(),
                end: end.as_str(),
                title: title.as_str().trim(),
            },
            _ => ActivityLine::Other,
        },
        None => ActivityLine::Other,
    }
}

/// Fold listing lines into records, carrying the current day forward.
pub fn fold_activity_lines<I, S>(lines: I, room: &str, tables: &Tables) -> Result<Vec<EventRecord>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (_, records) = lines.into_iter().try_fold(
        (None::<u8>, Vec::new()),
        |(current_day, mut records), line| {
            let line = squash_whitespace(line.as_ref());
            let current_day = match classify(&line, tables) {
                ActivityLine::DayHeader(day) => {
                    debug!(day, "Activity day header");
                    Some(day)
                }
                ActivityLine::Entry { start, end, title } => {
                    records.push(build_record(
                        RawEvent {
                            day: current_day,
                            title,
                            room,
                            start,
                            end,
                            description: "",
                        },
                        tables,
                    )?);
                    current_day
                }
                ActivityLine::Other => {
                    if !line.is_empty() {
                        trace!(line = %truncate_for_log(&line, 80), "Ignoring activity line");
                    }
                    current_day
                }
            };
            Ok::<_, ScheduleError>((current_day, records))
        },
    )?;
    Ok(records)
}

/// Extract records from the children of the first element matching `container`.
#[instrument(level = "debug", skip(document, tables))]
pub fn extract_activity(
    document: &Html,
    container: &str,
    room: &str,
    tables: &Tables,
) -> Result<Vec<EventRecord>> {
    let selector = Selector::parse(container).map_err(|e| ScheduleError::Selector {
        selector: container.to_string(),
        message: e.to_string(),
    })?;
    let section = document
        .select(&selector)
        .next()
        .ok_or_else(|| ScheduleError::malformed("activity container", container))?;

    let lines = section
        .children()
        .filter_map(ElementRef::wrap)
        .map(|child| child.text().collect::<String>());

    fold_activity_lines(lines, room, tables)
}
