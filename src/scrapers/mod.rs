//! Schedule page scrapers.
//!
//! Two page layouts are understood:
//!
//! | Layout | Module | Shape |
//! |--------|--------|-------|
//! | Full schedule | [`schedule`] | `.event` nodes under a `data-day` ancestor, with title/room/start/end/desc sub-elements |
//! | Activity listing | [`activity`] | day header lines followed by `<start> - <end> - <title>` lines, one room |
//!
//! Both produce [`EventRecord`]s through [`build_record`], so the correction
//! table, time parsing, clearance inference and cancellation marker behave the
//! same regardless of layout. Extraction is a pure function of the document and
//! the [`Tables`]; fetching lives in [`fetch_html`] / [`read_html`].

pub mod activity;
pub mod clearance;
pub mod schedule;

use crate::config::Tables;
use crate::error::Result;
use crate::models::EventRecord;
use crate::utils::time_code;
use reqwest::get;
use scraper::Html;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Which layout a document uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind<'a> {
    FullSchedule,
    Activity {
        /// Selector of the element whose children are the listing lines.
        container: &'a str,
        /// Room given to every record.
        room: &'a str,
    },
}

/// Extract every event from `document`.
///
/// # Errors
///
/// The first unparseable time or missing sub-element aborts the whole
/// extraction; nothing is skipped silently.
#[instrument(level = "info", skip(document, tables))]
pub fn extract(document: &Html, kind: &SourceKind<'_>, tables: &Tables) -> Result<Vec<EventRecord>> {
    let records = match kind {
        SourceKind::FullSchedule => schedule::extract_schedule(document, tables)?,
        SourceKind::Activity { container, room } => {
            activity::extract_activity(document, container, room, tables)?
        }
    };
    info!(count = records.len(), "Extracted events");
    Ok(records)
}

/// Raw fields of one event, before normalization.
#[derive(Debug)]
pub(crate) struct RawEvent<'a> {
    pub day: Option<u8>,
    pub title: &'a str,
    /// Room as stored; the full-schedule scraper maps it through the room table first.
    pub room: &'a str,
    pub start: &'a str,
    pub end: &'a str,
    pub description: &'a str,
}

/// Normalize raw fields into a record.
///
/// The end label is looked up in the correction table before parsing; the
/// stored `end_label` stays the scraped one.
pub(crate) fn build_record(raw: RawEvent<'_>, tables: &Tables) -> Result<EventRecord> {
    let corrected_end = tables.corrected_end(raw.day, raw.title, raw.end);
    if corrected_end != raw.end {
        debug!(title = raw.title, end = raw.end, corrected_end, "Applied end-time correction");
    }

    Ok(EventRecord {
        day: raw.day,
        start_label: raw.start.to_string(),
        end_label: raw.end.to_string(),
        start_code: time_code(raw.start)?,
        end_code: time_code(corrected_end)?,
        room: raw.room.to_string(),
        cleared_prior: clearance::cleared_prior(raw.description, &tables.clearance),
        cleared_after: clearance::cleared_after(raw.description, &tables.clearance),
        title: raw.title.to_string(),
        description: raw.description.to_string(),
        cancelled: tables.is_cancelled(raw.title),
    })
}

/// GET a page and return its body.
#[instrument(level = "info")]
pub async fn fetch_html(url: &str) -> Result<String> {
    let html = get(url).await?.error_for_status()?.text().await?;
    info!(bytes = html.len(), "Fetched page");
    Ok(html)
}

/// Read a saved copy of a page from disk.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_html(path: &Path) -> Result<String> {
    let html = tokio::fs::read_to_string(path).await?;
    info!(bytes = html.len(), "Read local page");
    Ok(html)
}
