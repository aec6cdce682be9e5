//! Data models for scraped schedule events.
//!
//! - [`EventRecord`]: one normalized panel/session, as stored in the CSV files
//! - [`Clearance`]: tri-state "is the room cleared" flag inferred from descriptions
//!
//! Field order of [`EventRecord`] is the column order of the CSV store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the room is cleared before or after a panel.
///
/// `Unknown` means the description did not say; it is not the same as `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Clearance {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
    #[default]
    #[serde(rename = "?")]
    Unknown,
}

impl Clearance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Clearance::Yes => "Y",
            Clearance::No => "N",
            Clearance::Unknown => "?",
        }
    }
}

impl fmt::Display for Clearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalized schedule entry.
///
/// Records are created once per scrape and never mutated afterwards; the
/// renderer only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EventRecord {
    /// Convention day number, `None` when the day label was not in the table.
    pub day: Option<u8>,
    /// Start time exactly as scraped, e.g. `"3:05 PM"`.
    pub start_label: String,
    /// End time exactly as scraped, before any correction.
    pub end_label: String,
    /// 24-hour `HHMM` start time.
    pub start_code: String,
    /// 24-hour `HHMM` end time, computed from the corrected end label.
    pub end_code: String,
    /// Canonical room slug, or the raw room label if unmapped.
    pub room: String,
    pub cleared_prior: Clearance,
    pub cleared_after: Clearance,
    pub title: String,
    pub description: String,
    pub cancelled: bool,
}

impl EventRecord {
    /// Title cut to `max` characters with a trailing `…` when longer.
    pub fn display_title(&self, max: usize) -> String {
        if self.title.chars().count() <= max {
            self.title.clone()
        } else {
            let kept: String = self.title.chars().take(max.saturating_sub(1)).collect();
            format!("{}…", kept.trim_end())
        }
    }

    /// Description prefixed with the full title, used for hover text.
    pub fn display_description(&self) -> String {
        let description = self.description.trim();
        if description.is_empty() {
            self.title.clone()
        } else {
            format!("{}\n\n{}", self.title, description)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(day: Option<u8>, title: &str) -> EventRecord {
        EventRecord {
            day,
            start_label: "10:00 AM".to_string(),
            end_label: "11:00 AM".to_string(),
            start_code: "1000".to_string(),
            end_code: "1100".to_string(),
            room: "petree-hall".to_string(),
            cleared_prior: Clearance::Unknown,
            cleared_after: Clearance::Unknown,
            title: title.to_string(),
            description: String::new(),
            cancelled: false,
        }
    }

    #[test]
    fn test_clearance_display_matches_csv_encoding() {
        assert_eq!(Clearance::Yes.to_string(), "Y");
        assert_eq!(Clearance::No.to_string(), "N");
        assert_eq!(Clearance::Unknown.to_string(), "?");
    }

    #[test]
    fn test_clearance_json_encoding() {
        let json = serde_json::to_string(&Clearance::Unknown).unwrap();
        assert_eq!(json, "\"?\"");
        let back: Clearance = serde_json::from_str("\"N\"").unwrap();
        assert_eq!(back, Clearance::No);
    }

    #[test]
    fn test_display_title_short_is_untouched() {
        let r = record(Some(1), "Opening Ceremony");
        assert_eq!(r.display_title(40), "Opening Ceremony");
    }

    #[test]
    fn test_display_title_truncates_with_placeholder() {
        let r = record(Some(1), "A Very Long Panel Title About Many Things");
        let shown = r.display_title(12);
        assert_eq!(shown, "A Very Long…");
        assert!(shown.chars().count() <= 12);
        // stored value is unchanged
        assert_eq!(r.title, "A Very Long Panel Title About Many Things");
    }

    #[test]
    fn test_display_description_prefixes_title() {
        let mut r = record(Some(2), "Cosplay Chess");
        assert_eq!(r.display_description(), "Cosplay Chess");
        r.description = "  Live chess with cosplayers. ".to_string();
        assert_eq!(
            r.display_description(),
            "Cosplay Chess\n\nLive chess with cosplayers."
        );
    }
}
