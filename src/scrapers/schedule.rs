//! Full schedule grid scraper.
//!
//! The page groups `.event` nodes under day containers carrying a `data-day`
//! attribute. Each event holds:
//!
//! ```html
//! <div data-day="Day 1 - July 4">
//!   <div class="event">
//!     <div class="title">Opening Ceremony</div>
//!     <div class="timebar">
//!       <span class="channel"><span class="bold">Main Events</span></span>
//!       <span class="start"><span class="bold">10:00 AM</span></span>
//!       <span class="end"><span class="bold">11:00 AM</span></span>
//!     </div>
//!     <div class="desc">Text... <a href="#">Add to calendar</a></div>
//!   </div>
//! </div>
//! ```

use super::{RawEvent, build_record};
use crate::config::Tables;
use crate::error::{Result, ScheduleError};
use crate::models::EventRecord;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static EVENT: Lazy<Selector> = Lazy::new(|| selector(".event"));
static TITLE: Lazy<Selector> = Lazy::new(|| selector(".title"));
static ROOM: Lazy<Selector> = Lazy::new(|| selector(".timebar .channel .bold"));
static START: Lazy<Selector> = Lazy::new(|| selector(".timebar .start .bold"));
static END: Lazy<Selector> = Lazy::new(|| selector(".timebar .end .bold"));
static DESC: Lazy<Selector> = Lazy::new(|| selector(".desc"));

const DAY_ATTR: &str = "data-day";

/// Extract every `.event` node, in document order.
#[instrument(level = "debug", skip_all)]
pub fn extract_schedule(document: &Html, tables: &Tables) -> Result<Vec<EventRecord>> {
    document
        .select(&EVENT)
        .enumerate()
        .map(|(index, node)| parse_event(node, index, tables))
        .collect()
}

fn parse_event(node: ElementRef<'_>, index: usize, tables: &Tables) -> Result<EventRecord> {
    let context = || format!("event #{index}");

    let day_label = node
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find_map(|e| e.value().attr(DAY_ATTR))
        .ok_or_else(|| ScheduleError::malformed("data-day ancestor", context()))?;

    let title = sub_text(node, &TITLE, ".title", index)?;
    let room = tables.room(&sub_text(node, &ROOM, ".timebar .channel .bold", index)?);
    let start = sub_text(node, &START, ".timebar .start .bold", index)?;
    let end = sub_text(node, &END, ".timebar .end .bold", index)?;
    let description = node
        .select(&DESC)
        .next()
        .map(own_text)
        .ok_or_else(|| ScheduleError::malformed(".desc", format!("{} {title:?}", context())))?;

    debug!(index, day_label, %title, %room, %start, %end, "Parsed event node");

    build_record(
        RawEvent {
            day: tables.day(day_label),
            title: &title,
            room: &room,
            start: &start,
            end: &end,
            description: &description,
        },
        tables,
    )
}

/// Trimmed text of the first match of `sel` under `node`.
fn sub_text(node: ElementRef<'_>, sel: &Selector, field: &'static str, index: usize) -> Result<String> {
    node.select(sel)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .ok_or_else(|| ScheduleError::malformed(field, format!("event #{index}")))
}

/// Concatenated direct text children; nested elements (links, buttons) are skipped.
fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|text| &**text)
        .collect()
}
