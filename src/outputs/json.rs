//! JSON snapshot of what was rendered.
//!
//! Optional; the pages do not depend on it. Written as
//! `{output_dir}/schedule.json`:
//!
//! ```json
//! { "last_updated_time": "...", "days": { "unknown": [...], "1": [ {...}, ... ], "10": [...] } }
//! ```
//!
//! Days are written in numeric order, the unknown-day bucket first.

use crate::aggregate::DayGroups;
use crate::error::Result;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub last_updated_time: &'a str,
    #[serde(serialize_with = "serialize_days")]
    pub days: &'a DayGroups,
}

impl<'a> Snapshot<'a> {
    pub fn new(groups: &'a DayGroups, last_updated_time: &'a str) -> Self {
        Self {
            last_updated_time,
            days: groups,
        }
    }
}

/// JSON object keys must be strings; the map stays ordered by day number.
fn serialize_days<S: Serializer>(groups: &&DayGroups, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(groups.iter().map(|(day, events)| (day_key(*day), events)))
}

fn day_key(day: Option<u8>) -> String {
    day.map_or_else(|| "unknown".to_string(), |d| d.to_string())
}

/// Serialize the grouped, cancellation-filtered records.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_snapshot(
    groups: &DayGroups,
    last_updated_time: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(&Snapshot::new(groups, last_updated_time))?;

    fs::create_dir_all(output_dir).await?;
    let path = output_dir.join("schedule.json");
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON snapshot");
    Ok(path)
}
