//! Per-day HTML tables.
//!
//! Pages are rendered from `templates/day.html` and written as
//! `{output_dir}/day{N}.html`.

use crate::aggregate::RenderedDay;
use crate::error::Result;
use crate::models::EventRecord;
use askama::Template;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// A record plus the strings the page shows for it.
pub struct EventRow<'a> {
    pub event: &'a EventRecord,
    pub short_title: String,
    pub hover_text: String,
}

#[derive(Template)]
#[template(path = "day.html")]
struct DayTemplate<'a> {
    day: u8,
    /// Every rendered day, for the navigation links.
    days: &'a [u8],
    events: Vec<EventRow<'a>>,
    last_updated_time: &'a str,
}

/// Render the page for one day.
pub fn render_day(
    day: u8,
    days: &[u8],
    events: &[EventRecord],
    last_updated_time: &str,
    title_max_len: usize,
) -> Result<String> {
    let rows = events
        .iter()
        .map(|event| EventRow {
            event,
            short_title: event.display_title(title_max_len),
            hover_text: event.display_description(),
        })
        .collect();

    let page = DayTemplate {
        day,
        days,
        events: rows,
        last_updated_time,
    };
    Ok(page.render()?)
}

pub fn day_filename(output_dir: &Path, day: u8) -> PathBuf {
    output_dir.join(format!("day{day}.html"))
}

/// Write every rendered page into `output_dir`.
#[instrument(level = "info", skip(pages), fields(output_dir = %output_dir.display(), pages = pages.len()))]
pub async fn write_rendered(output_dir: &Path, pages: &[RenderedDay]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).await?;
    let mut written = Vec::with_capacity(pages.len());
    for page in pages {
        let path = day_filename(output_dir, page.day);
        fs::write(&path, &page.html).await?;
        info!(path = %path.display(), events = page.event_count, "Wrote day page");
        written.push(path);
    }
    Ok(written)
}
