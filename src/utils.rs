//! Helpers for clock-time parsing, log-friendly strings and output directories.

use crate::error::{Result, ScheduleError};
use chrono::NaiveTime;
use itertools::Itertools;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// 12-hour clock with a space before the designator, e.g. `3:05 PM`.
const CLOCK_SPACED: &str = "%I:%M %p";
/// Same without the space, e.g. `3:05PM`, which the source markup sometimes emits.
const CLOCK_TIGHT: &str = "%I:%M%p";

/// Parse a 12-hour label into a 24-hour `HHMM` code.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(time_code("3:05 PM")?, "1505");
/// assert_eq!(time_code("11:20AM")?, "1120");
/// ```
///
/// # Errors
///
/// [`ScheduleError::TimeParse`] when the label matches neither format.
pub fn time_code(label: &str) -> Result<String> {
    let label = label.trim();
    let time = NaiveTime::parse_from_str(label, CLOCK_SPACED)
        .or_else(|_| NaiveTime::parse_from_str(label, CLOCK_TIGHT))
        .map_err(|_| ScheduleError::TimeParse {
            label: label.to_string(),
        })?;
    Ok(time.format("%H%M").to_string())
}

/// Collapse runs of whitespace (newlines, nbsp) to single spaces and trim.
pub fn squash_whitespace(s: &str) -> String {
    s.split_whitespace().join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with `"…(+N chars)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let total = s.chars().count();
    if total <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{}…(+{} chars)", head, total - max)
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a scratch file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    // sync check keeps the error surface simple
    let scratch_path = path.join("..__write_check__");
    stdfs::File::create(&scratch_path)?;
    if let Err(e) = stdfs::remove_file(&scratch_path) {
        warn!(path = %scratch_path.display(), error = %e, "Failed to remove write check file");
    }
    info!("Output directory is writable");
    Ok(())
}
