//! Runtime configuration and lookup tables.
//!
//! Everything here can be supplied in a YAML file (`--config`). Missing
//! fields fall back to the built-in defaults, which describe the 2024
//! schedule page, so running without a config file reproduces the fixed
//! behavior of earlier versions.
//!
//! ```yaml
//! schedule_url: https://www.anime-expo.org/ax/schedule-2024/
//! output_dir: docs/2024
//! days: [1, 2, 3, 4]
//! activities:
//!   - name: beer-garden
//!     url: https://www.anime-expo.org/activity/beer-garden/
//!     container: .entry-content
//!     room: beer-garden
//!     csv: beer_garden_events.csv
//! tables:
//!   rooms:
//!     Petree Hall: petree-hall
//! ```

use crate::error::{Result, ScheduleError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use url::Url;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Main schedule page.
    pub schedule_url: String,
    /// Directory holding the CSV stores.
    pub data_dir: PathBuf,
    /// Directory receiving `day{N}.html`.
    pub output_dir: PathBuf,
    /// File name of the main schedule store inside `data_dir`.
    pub events_csv: String,
    /// Days rendered, in output order.
    pub days: Vec<u8>,
    pub activities: Vec<ActivitySource>,
    /// Stores produced elsewhere, concatenated after the scraped ones.
    pub extra_csv: Vec<String>,
    pub write_snapshot: bool,
    /// Longest title shown in the table before truncation.
    pub title_max_len: usize,
    pub tables: Tables,
}

/// A secondary listing page: one room, day headers followed by
/// `<start> - <end> - <title>` lines.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActivitySource {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Selector of the element whose children are the listing lines.
    #[serde(default = "default_container")]
    pub container: String,
    /// Room identifier given to every record from this source.
    pub room: String,
    /// File name of this source's store inside `data_dir`.
    pub csv: String,
}

fn default_container() -> String {
    ".entry-content".to_string()
}

/// Where an activity listing is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location<'a> {
    Url(&'a str),
    File(&'a Path),
}

impl ActivitySource {
    pub fn location(&self) -> Result<Location<'_>> {
        match (&self.url, &self.file) {
            (Some(url), None) => Ok(Location::Url(url)),
            (None, Some(file)) => Ok(Location::File(file)),
            _ => Err(ScheduleError::ActivityLocation(self.name.clone())),
        }
    }
}

/// Exact-match override for a known bad end time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EndCorrection {
    pub day: Option<u8>,
    pub title: String,
    pub end: String,
    pub corrected: String,
}

/// Phrases searched (lowercased) in descriptions. Positive lists win.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClearancePhrases {
    pub prior_yes: Vec<String>,
    pub prior_no: Vec<String>,
    pub after_yes: Vec<String>,
    pub after_no: Vec<String>,
}

impl Default for ClearancePhrases {
    fn default() -> Self {
        Self {
            prior_yes: strings(&["this room will be cleared prior to this panel"]),
            prior_no: strings(&["this room will not be cleared prior to this panel"]),
            after_yes: strings(&[
                "this room will be cleared for the next panel",
                "this room will be cleared after this panel",
            ]),
            after_no: strings(&[
                "this room will not be cleared after this panel",
                "this room will not be cleared for the next panel",
            ]),
        }
    }
}

/// The lookup tables in effect for one extraction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Tables {
    /// Raw day label (`data-day` attribute or listing header) to day number.
    pub day_labels: BTreeMap<String, u8>,
    /// Raw room label to canonical slug.
    pub rooms: BTreeMap<String, String>,
    pub end_corrections: Vec<EndCorrection>,
    pub clearance: ClearancePhrases,
    /// Substrings of a title that mark the event as cancelled.
    pub cancel_markers: Vec<String>,
}

impl Tables {
    /// An empty table set: every label unmapped, no corrections.
    pub fn empty() -> Self {
        Self {
            day_labels: BTreeMap::new(),
            rooms: BTreeMap::new(),
            end_corrections: Vec::new(),
            clearance: ClearancePhrases::default(),
            cancel_markers: strings(&["CANCELED", "CANCELLED"]),
        }
    }

    pub fn day(&self, label: &str) -> Option<u8> {
        self.day_labels.get(label).copied()
    }

    /// Canonical slug, or the label itself when unmapped.
    pub fn room(&self, label: &str) -> String {
        self.rooms
            .get(label)
            .cloned()
            .unwrap_or_else(|| label.to_string())
    }

    /// The end label to parse: the override for this exact triple, else `end`.
    pub fn corrected_end<'a>(&'a self, day: Option<u8>, title: &str, end: &'a str) -> &'a str {
        self.end_corrections
            .iter()
            .find(|c| c.day == day && c.title == title && c.end == end)
            .map(|c| c.corrected.as_str())
            .unwrap_or(end)
    }

    pub fn is_cancelled(&self, title: &str) -> bool {
        self.cancel_markers.iter().any(|m| title.contains(m.as_str()))
    }
}

impl Default for Tables {
    fn default() -> Self {
        let day_labels = [
            ("Day 1 - July 4", 1),
            ("Day 2 - July 5", 2),
            ("Day 3 - July 6", 3),
            ("Day 4 - July 7", 4),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let rooms = [
            ("Main Events", "main-events"),
            ("Petree Hall", "petree-hall"),
            ("Community Stage", "community-stage"),
            ("JW-Diamond", "jw-diamond"),
            ("JW-Platinum", "jw-platinum"),
            ("The Novo", "the-novo"),
            ("Grammy Museum Terrace", "grammy-museum-terrace"),
            ("402AB", "402-AB"),
            ("403AB", "403-AB"),
            ("404AB", "404-AB"),
            ("406AB", "406-AB"),
            ("408AB", "408-AB"),
            ("409AB", "409-AB"),
            ("411", "411"),
            ("511ABC", "511-ABC"),
            ("515A", "515-A"),
            ("515B", "515-B"),
            ("AX Dance (Concourse Hall E)", "ax-dance"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let end_corrections = vec![
            EndCorrection {
                day: Some(1),
                title: "Create Your Own Omamori Amulet & Envision Your Ideal Community!".to_string(),
                end: "3:05 AM".to_string(),
                corrected: "3:05 PM".to_string(),
            },
            EndCorrection {
                day: Some(1),
                title: "Voices of the Night: Behind the Making of Ex and Bee - Nightfall's Coven"
                    .to_string(),
                end: "4:05 AM".to_string(),
                corrected: "4:05 PM".to_string(),
            },
            EndCorrection {
                day: Some(2),
                title: "ATLUS Presents: The World of Metaphor: ReFantazio featuring Katsura Hashino & Shigenori Soejima".to_string(),
                end: "11:20 PM".to_string(),
                corrected: "11:20 AM".to_string(),
            },
        ];

        Self {
            day_labels,
            rooms,
            end_corrections,
            ..Self::empty()
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            schedule_url: "https://www.anime-expo.org/ax/schedule-2024/".to_string(),
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("docs"),
            events_csv: "parsed_events.csv".to_string(),
            days: vec![1, 2, 3, 4],
            activities: Vec::new(),
            extra_csv: Vec::new(),
            write_snapshot: false,
            title_max_len: 60,
            tables: Tables::default(),
        }
    }
}

impl ScheduleConfig {
    /// Load from `path`, or return the defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                let config = Self::from_yaml(&text)?;
                info!(path = %path.display(), "Loaded configuration");
                config
            }
            None => {
                debug!("No config file given; using built-in defaults");
                Self::default()
            }
        };
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        check_url(&self.schedule_url)?;
        for source in &self.activities {
            if let Location::Url(url) = source.location()? {
                check_url(url)?;
            }
        }
        Ok(())
    }

    pub fn events_csv_path(&self) -> PathBuf {
        self.data_dir.join(&self.events_csv)
    }

    pub fn activity_csv_path(&self, source: &ActivitySource) -> PathBuf {
        self.data_dir.join(&source.csv)
    }

    /// Every store read at render time, in concatenation order.
    pub fn store_paths(&self) -> Vec<PathBuf> {
        std::iter::once(self.events_csv_path())
            .chain(self.activities.iter().map(|a| self.activity_csv_path(a)))
            .chain(self.extra_csv.iter().map(|name| self.data_dir.join(name)))
            .collect()
    }
}

fn check_url(url: &str) -> Result<()> {
    Url::parse(url).map_err(|source| ScheduleError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    Ok(())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_lookup_falls_back_to_label() {
        let tables = Tables::default();
        assert_eq!(tables.room("Petree Hall"), "petree-hall");
        assert_eq!(tables.room("Hall K"), "Hall K");
    }

    #[test]
    fn test_day_lookup() {
        let tables = Tables::default();
        assert_eq!(tables.day("Day 3 - July 6"), Some(3));
        assert_eq!(tables.day("Day 5 - July 8"), None);
    }

    #[test]
    fn test_corrected_end_exact_match_only() {
        let tables = Tables::default();
        let title = "Create Your Own Omamori Amulet & Envision Your Ideal Community!";
        assert_eq!(tables.corrected_end(Some(1), title, "3:05 AM"), "3:05 PM");
        // any part of the key differing means no correction
        assert_eq!(tables.corrected_end(Some(2), title, "3:05 AM"), "3:05 AM");
        assert_eq!(tables.corrected_end(Some(1), title, "3:15 AM"), "3:15 AM");
        assert_eq!(tables.corrected_end(Some(1), "Other", "3:05 AM"), "3:05 AM");
    }

    #[test]
    fn test_cancel_markers() {
        let tables = Tables::empty();
        assert!(tables.is_cancelled("CANCELED - Idol Showcase"));
        assert!(tables.is_cancelled("Idol Showcase (CANCELLED)"));
        assert!(!tables.is_cancelled("Idol Showcase"));
    }

    #[test]
    fn test_load_without_path_gives_defaults() {
        let config = ScheduleConfig::load(None).unwrap();
        assert_eq!(config.days, vec![1, 2, 3, 4]);
        assert_eq!(config.events_csv_path(), PathBuf::from("data/parsed_events.csv"));
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
output_dir: docs/2024
tables:
  rooms:
    Hall K: hall-k
"#;
        let config = ScheduleConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("docs/2024"));
        assert_eq!(config.tables.room("Hall K"), "hall-k");
        // replaced table has no default rooms left
        assert_eq!(config.tables.room("Petree Hall"), "Petree Hall");
        // untouched table sections keep defaults
        assert_eq!(config.tables.cancel_markers, vec!["CANCELED", "CANCELLED"]);
        assert_eq!(config.schedule_url, "https://www.anime-expo.org/ax/schedule-2024/");
    }

    #[test]
    fn test_example_config_matches_builtin_tables() {
        let config = ScheduleConfig::from_yaml(include_str!("../ax_schedule.example.yaml")).unwrap();
        assert_eq!(config.tables, Tables::default());
        assert_eq!(config.output_dir, PathBuf::from("docs/2024"));
        assert_eq!(
            config.activities[0].location().unwrap(),
            Location::File(Path::new("ax2024/ax_dance.html"))
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = ScheduleConfig::from_yaml("schedule_url: not a url\n").unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidUrl { .. }));
    }

    #[test]
    fn test_activity_needs_one_location() {
        let yaml = r#"
activities:
  - name: lounge
    room: lounge21
    csv: lounge21_events.csv
"#;
        let err = ScheduleConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ScheduleError::ActivityLocation(name) if name == "lounge"));
    }

    #[test]
    fn test_store_paths_order() {
        let yaml = r#"
data_dir: out
activities:
  - name: dance
    file: dance.html
    room: ax-dance
    csv: ax_dance_events.csv
extra_csv: [community_events.csv]
"#;
        let config = ScheduleConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.activities[0].container, ".entry-content");
        assert_eq!(
            config.store_paths(),
            vec![
                PathBuf::from("out/parsed_events.csv"),
                PathBuf::from("out/ax_dance_events.csv"),
                PathBuf::from("out/community_events.csv"),
            ]
        );
    }
}
