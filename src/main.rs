//! # AX Schedule
//!
//! Scrapes a convention's public schedule page into CSV and renders one
//! sortable HTML table per convention day.
//!
//! ## Usage
//!
//! ```sh
//! ax_schedule                      # scrape + render
//! ax_schedule scrape --from-file ax_schedule.html
//! ax_schedule render --snapshot
//! ```
//!
//! ## Architecture
//!
//! The pipeline has two phases so pages can be re-rendered without
//! re-fetching:
//! 1. **Scrape**: fetch the schedule (and each activity listing), extract
//!    normalized events, write one CSV store per source
//! 2. **Render**: read every store, drop cancelled events, group by day,
//!    write `dayN.html` (and optionally `schedule.json`)
//!
//! Everything runs sequentially; the first error aborts the run.

use chrono::Local;
use clap::Parser;
use futures::stream::{self, TryStreamExt};
use scraper::Html;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod scrapers;
mod store;
mod utils;

use cli::{Cli, Command};
use config::{ActivitySource, Location, ScheduleConfig, Tables};
use error::{Result, ScheduleError};
use models::EventRecord;
use scrapers::SourceKind;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("ax_schedule starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    let outcome = match args.command() {
        Command::Scrape { from_file } => scrape(&config, from_file.as_deref()).await,
        Command::Render { snapshot } => render(&config, snapshot).await,
        Command::Run {
            from_file,
            snapshot,
        } => match scrape(&config, from_file.as_deref()).await {
            Ok(()) => render(&config, snapshot).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = outcome {
        error!(error = %e, "Run aborted");
        return Err(e.into());
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

/// Config file (or defaults) with CLI directory overrides applied.
fn load_config(args: &Cli) -> Result<ScheduleConfig> {
    let mut config = ScheduleConfig::load(args.config.as_deref())?;
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    info!(
        output_dir = %config.output_dir.display(),
        data_dir = %config.data_dir.display(),
        days = ?config.days,
        activities = config.activities.len(),
        "Configuration ready"
    );
    Ok(config)
}

/// Parse a page and extract it. Kept synchronous so the parse tree never
/// lives across an await point.
fn extract_page(html: &str, kind: &SourceKind<'_>, tables: &Tables) -> Result<Vec<EventRecord>> {
    let document = Html::parse_document(html);
    scrapers::extract(&document, kind, tables)
}

#[instrument(level = "info", skip(config))]
async fn scrape(config: &ScheduleConfig, from_file: Option<&Path>) -> Result<()> {
    let html = match from_file {
        Some(path) => scrapers::read_html(path).await?,
        None => scrapers::fetch_html(&config.schedule_url).await?,
    };
    let records = extract_page(&html, &SourceKind::FullSchedule, &config.tables)?;
    let cancelled = records.iter().filter(|r| r.cancelled).count();
    let unknown_day = records.iter().filter(|r| r.day.is_none()).count();
    info!(count = records.len(), cancelled, unknown_day, "Extracted main schedule");
    store::write_events(&config.events_csv_path(), &records)?;

    // one listing at a time, in config order
    stream::iter(config.activities.iter().map(Ok::<_, ScheduleError>))
        .try_for_each(|source| scrape_activity(config, source))
        .await?;

    Ok(())
}

#[instrument(level = "info", skip_all, fields(source = %source.name))]
async fn scrape_activity(config: &ScheduleConfig, source: &ActivitySource) -> Result<()> {
    let html = match source.location()? {
        Location::Url(url) => scrapers::fetch_html(url).await?,
        Location::File(path) => scrapers::read_html(path).await?,
    };
    let kind = SourceKind::Activity {
        container: &source.container,
        room: &source.room,
    };
    let records = extract_page(&html, &kind, &config.tables)?;
    info!(count = records.len(), room = %source.room, "Extracted activity listing");
    store::write_events(&config.activity_csv_path(source), &records)
}

#[instrument(level = "info", skip(config))]
async fn render(config: &ScheduleConfig, snapshot: bool) -> Result<()> {
    let records = store::read_all(&config.store_paths())?;
    let total = records.len();
    let groups = aggregate::active_groups(records);
    let kept: usize = groups.values().map(Vec::len).sum();
    info!(total, kept, cancelled = total - kept, "Loaded events");

    let last_updated_time = Local::now().format("%Y-%m-%d %H:%M (UTC%:z)").to_string();

    utils::ensure_writable_dir(&config.output_dir).await?;
    let pages = aggregate::render_by_day(&groups, &config.days, &last_updated_time, config.title_max_len)?;
    outputs::html::write_rendered(&config.output_dir, &pages).await?;

    if snapshot || config.write_snapshot {
        outputs::json::write_snapshot(&groups, &last_updated_time, &config.output_dir).await?;
    }
    Ok(())
}
