//! Report writers: HTML table, TSV and chronological timeline
//!
//! Every row kind implements [`ReportRow`]; the writers are generic over it.

pub mod html;
pub mod timeline;
pub mod tsv;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::api::ExtractionReport;
use crate::config::{ReportConfig, ReportFormat};
use crate::core::format_report_time;
use crate::error::Result;
use crate::parsing::{SnoozedRow, StatusRow};
use crate::projection::NormalizedRow;

pub use html::write_html;
pub use timeline::write_timeline;
pub use tsv::write_tsv;

pub const REPORT_PREFIX: &str = "Android Notification History";

/// A row that can be rendered by the report writers.
pub trait ReportRow: Serialize {
    /// Report name suffix, e.g. `Notifications`.
    const KIND: &'static str;
    const DESCRIPTION: &'static str;

    fn headers() -> &'static [&'static str];

    /// One text cell per header. Null renders empty.
    fn cells(&self) -> Vec<String>;

    /// Time used to place the row on the timeline.
    fn timeline_time(&self) -> Option<DateTime<Utc>>;

    fn report_name() -> String {
        format!("{} - {}", REPORT_PREFIX, Self::KIND)
    }
}

fn time_cell(time: Option<&DateTime<Utc>>) -> String {
    time.map(format_report_time).unwrap_or_default()
}

fn opt_cell<T: ToString>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

impl ReportRow for NormalizedRow {
    const KIND: &'static str = "Notifications";
    const DESCRIPTION: &'static str =
        "A history of the notifications that landed on the device during the last 24h";

    fn headers() -> &'static [&'static str] {
        &NormalizedRow::HEADERS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            time_cell(self.posted_time.as_ref()),
            opt_cell(self.title.as_ref()),
            opt_cell(self.text.as_ref()),
            self.package.clone(),
            self.user_id.to_string(),
            self.uid.to_string(),
            self.package_index.to_string(),
            self.channel_name.clone(),
            self.channel_name_index.to_string(),
            self.channel_id.clone(),
            self.channel_id_index.to_string(),
            self.conversation_id.clone(),
            self.conversation_id_index.to_string(),
            opt_cell(self.major_version.as_ref()),
            opt_cell(self.image_type.as_ref()),
            opt_cell(self.image_bitmap_filename.as_ref()),
            opt_cell(self.image_resource_id.as_ref()),
            opt_cell(self.image_resource_id_package.as_ref()),
            opt_cell(self.image_data_length.as_ref()),
            opt_cell(self.image_data_offset.as_ref()),
            opt_cell(self.image_uri.as_ref()),
            self.source_file_name.clone(),
            time_cell(self.source_file_creation_time.as_ref()),
        ]
    }

    fn timeline_time(&self) -> Option<DateTime<Utc>> {
        self.posted_time
    }
}

impl ReportRow for StatusRow {
    const KIND: &'static str = "Status";
    const DESCRIPTION: &'static str =
        "Indicates whether \"Notification History\" feature is enabled.";

    fn headers() -> &'static [&'static str] {
        &["Status", "User"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.status.as_str().to_string(), self.user.clone()]
    }

    fn timeline_time(&self) -> Option<DateTime<Utc>> {
        None
    }
}

impl ReportRow for SnoozedRow {
    const KIND: &'static str = "Snoozed notifications";
    const DESCRIPTION: &'static str =
        "Notifications the user chose to snooze for a specific time interval";

    fn headers() -> &'static [&'static str] {
        &["Reminder Time", "Snoozed Notification"]
    }

    fn cells(&self) -> Vec<String> {
        vec![time_cell(self.reminder_time.as_ref()), self.key.clone()]
    }

    fn timeline_time(&self) -> Option<DateTime<Utc>> {
        self.reminder_time
    }
}

/// Writes every non-empty row kind of an extraction in the configured formats.
pub struct ReportWriter {
    config: ReportConfig,
}

impl ReportWriter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn write_all(&self, report: &ExtractionReport) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.config.output_dir)?;
        let mut written = Vec::new();
        self.write_kind(&report.notifications, &mut written)?;
        self.write_kind(&report.statuses, &mut written)?;
        self.write_kind(&report.snoozed, &mut written)?;
        info!(
            output = %self.config.output_dir.display(),
            files = written.len(),
            "reports written"
        );
        Ok(written)
    }

    fn write_kind<R: ReportRow>(&self, rows: &[R], written: &mut Vec<PathBuf>) -> Result<()> {
        if rows.is_empty() {
            info!("No {} available", R::report_name());
            return Ok(());
        }
        let dir: &Path = &self.config.output_dir;
        for format in &self.config.formats {
            let path = match format {
                ReportFormat::Html => Some(write_html(dir, rows)?),
                ReportFormat::Tsv => Some(write_tsv(dir, rows)?),
                ReportFormat::Timeline => write_timeline(dir, rows)?,
            };
            written.extend(path);
        }
        Ok(())
    }
}
