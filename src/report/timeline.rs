use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::report::ReportRow;

/// One line of the timeline file
#[derive(Debug, Serialize)]
pub struct TimelineEntry<'a, R: Serialize> {
    pub timestamp: DateTime<Utc>,
    pub activity: &'a str,
    pub row: &'a R,
}

/// Rows that carry a time, oldest first. Rows without a time are left out.
pub fn timeline_entries<'a, R: ReportRow>(
    activity: &'a str,
    rows: &'a [R],
) -> Vec<TimelineEntry<'a, R>> {
    let mut entries: Vec<_> = rows
        .iter()
        .filter_map(|row| {
            row.timeline_time().map(|timestamp| TimelineEntry { timestamp, activity, row })
        })
        .collect();
    entries.sort_by_key(|entry| entry.timestamp);
    entries
}

/// Write a JSON Lines timeline. Returns `None` when no row has a time.
pub fn write_timeline<R: ReportRow>(dir: &Path, rows: &[R]) -> Result<Option<PathBuf>> {
    let activity = R::report_name();
    let entries = timeline_entries(&activity, rows);
    if entries.is_empty() {
        return Ok(None);
    }

    let path = dir.join(format!("{}.timeline.jsonl", activity));
    let mut out = BufWriter::new(File::create(&path)?);
    for entry in &entries {
        serde_json::to_writer(&mut out, entry)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    tracing::debug!(path = %path.display(), entries = entries.len(), "wrote timeline");
    Ok(Some(path))
}
