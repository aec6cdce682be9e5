//! CSV store for extracted events.
//!
//! One file per source (main schedule, each activity listing). Columns follow
//! the field order of [`EventRecord`]:
//!
//! ```text
//! day,start_label,end_label,start_code,end_code,room,cleared_prior,cleared_after,title,description,cancelled
//! ```
//!
//! Reading matches columns by header name. Cancelled records are written like
//! any other; filtering happens at render time.

use crate::error::Result;
use crate::models::EventRecord;
use csv::{ReaderBuilder, Writer};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Serialize records (header first) into any writer.
pub fn write_to<W: Write>(writer: W, records: &[EventRecord]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    // header is only emitted with the first row
    if records.is_empty() {
        wtr.write_record(COLUMNS)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Deserialize every row of a CSV stream.
pub fn read_from<R: Read>(reader: R) -> Result<Vec<EventRecord>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let records = rdr
        .deserialize::<EventRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(records)
}

pub const COLUMNS: [&str; 11] = [
    "day",
    "start_label",
    "end_label",
    "start_code",
    "end_code",
    "room",
    "cleared_prior",
    "cleared_after",
    "title",
    "description",
    "cancelled",
];

/// Write a store file, creating its directory if needed.
#[instrument(level = "info", skip(records), fields(count = records.len()))]
pub fn write_events(path: &Path, records: &[EventRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_to(file, records)?;
    info!(path = %path.display(), "Wrote events CSV");
    Ok(())
}

#[instrument(level = "info")]
pub fn read_events(path: &Path) -> Result<Vec<EventRecord>> {
    let file = fs::File::open(path)?;
    let records = read_from(file)?;
    info!(path = %path.display(), count = records.len(), "Read events CSV");
    Ok(records)
}

/// Concatenate several stores in the given order.
pub fn read_all(paths: &[PathBuf]) -> Result<Vec<EventRecord>> {
    let mut records = Vec::new();
    for path in paths {
        records.extend(read_events(path)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Clearance;
    use crate::models::tests::record;

    fn sample() -> Vec<EventRecord> {
        let mut a = record(Some(1), "Opening, with \"quotes\"");
        a.description = "Line one.\nThis room will be cleared prior to this panel.".to_string();
        a.cleared_prior = Clearance::Yes;
        a.cleared_after = Clearance::No;
        let mut b = record(None, "CANCELED - Meetup");
        b.cancelled = true;
        b.room = "Hall K".to_string();
        vec![a, b]
    }

    #[test]
    fn test_round_trip_is_field_for_field() {
        let records = sample();
        let mut buf = Vec::new();
        write_to(&mut buf, &records).unwrap();
        let back = read_from(buf.as_slice()).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_header_and_encoding() {
        let mut buf = Vec::new();
        write_to(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), COLUMNS.join(","));
        assert!(text.contains(",Y,N,"));
        // unknown day is an empty cell
        assert!(text.lines().last().unwrap().starts_with(",10:00 AM,"));
        assert!(text.trim_end().ends_with(",true"));
    }

    #[test]
    fn test_empty_store_still_has_header() {
        let mut buf = Vec::new();
        write_to(&mut buf, &[]).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert_eq!(text.trim_end(), COLUMNS.join(","));
        assert!(read_from(buf.as_slice()).unwrap().is_empty());
    }

    #[test]
    fn test_read_by_column_name() {
        let csv = "\
title,day,room,start_label,end_label,start_code,end_code,cleared_prior,cleared_after,description,cancelled
Swap Meet,2,411,9:30 AM,10:45 AM,0930,1045,?,?,,false
";
        let records = read_from(csv.as_bytes()).unwrap();
        assert_eq!(records[0].title, "Swap Meet");
        assert_eq!(records[0].day, Some(2));
        assert_eq!(records[0].cleared_prior, Clearance::Unknown);
    }

    #[test]
    fn test_read_all_concatenates_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let main = tmp.path().join("data/parsed_events.csv");
        let dance = tmp.path().join("data/ax_dance_events.csv");
        write_events(&main, &[record(Some(1), "A")]).unwrap();
        write_events(&dance, &[record(Some(1), "B"), record(Some(2), "C")]).unwrap();

        let all = read_all(&[main, dance]).unwrap();
        let titles: Vec<_> = all.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_missing_store_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(read_events(&tmp.path().join("nope.csv")).is_err());
    }
}
