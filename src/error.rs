//! Error type shared by the scrape and render stages.
//!
//! Unmapped day/room labels and missing end-time corrections are not errors:
//! they have defined fallbacks and never reach this type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    // ---------------------------
    // Extraction
    // ---------------------------
    #[error("Unparseable time label: {label:?}")]
    TimeParse { label: String },

    #[error("Malformed document: missing {field} ({context})")]
    Malformed { field: &'static str, context: String },

    #[error("Invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },

    // ---------------------------
    // Transport / IO
    // ---------------------------
    #[error("Fetch failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Output
    // ---------------------------
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Configuration
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Activity source {0:?} needs exactly one of `url` or `file`")]
    ActivityLocation(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

impl ScheduleError {
    pub(crate) fn malformed(field: &'static str, context: impl Into<String>) -> Self {
        ScheduleError::Malformed {
            field,
            context: context.into(),
        }
    }
}
