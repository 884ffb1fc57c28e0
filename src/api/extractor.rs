//! Extraction pipeline: decode every artifact file and project it into rows.
//!
//! History files are independent of each other, so with more than one worker
//! thread the file list is split into contiguous chunks that are processed in
//! parallel. Each file loads its own string pool, projects its records and
//! drops the pool before the next file starts.

use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::ExtractorConfig;
use crate::error::{Error, Result};
use crate::parsing::{
    decode_history, extract_snoozed, extract_status, read_xml_document, HistoryDecodeError,
    SnoozedRow, StatusRow,
};
use crate::projection::{NormalizedRow, RecordProjector};
use crate::sources::{ArtifactFile, ArtifactKind};

/// Rows projected from one history file.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRows {
    pub rows: Vec<NormalizedRow>,
    pub truncated: bool,
    pub major_version: Option<i32>,
}

/// A file that could not be decoded at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionReport {
    pub notifications: Vec<NormalizedRow>,
    pub statuses: Vec<StatusRow>,
    pub snoozed: Vec<SnoozedRow>,
    pub skipped: Vec<SkippedFile>,
}

impl ExtractionReport {
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty() && self.statuses.is_empty() && self.snoozed.is_empty()
    }
}

enum FileOutcome {
    History(Vec<NormalizedRow>),
    Status(Vec<StatusRow>),
    Snoozed(Vec<SnoozedRow>),
    Skipped(SkippedFile),
}

/// Decode one history file and project every notification in it.
///
/// `file_name` is the bare file name, which encodes the creation time.
pub fn project_history(
    bytes: &[u8],
    file_name: &str,
) -> std::result::Result<HistoryRows, HistoryDecodeError> {
    let history = decode_history(bytes)?;
    let projector = RecordProjector::new(history.major_version, file_name);
    let rows = projector.project_all(&history.records, &history.string_pool);

    if history.major_version != Some(1) {
        debug!(major_version = ?history.major_version, file_name, "unexpected history format version");
    }

    Ok(HistoryRows { rows, truncated: history.truncated, major_version: history.major_version })
}

pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Process every file. Files that cannot be decoded are logged and listed
    /// in [`ExtractionReport::skipped`]; they never stop the run.
    pub fn run(&self, files: &[ArtifactFile]) -> ExtractionReport {
        let threads = self.config.worker_threads.max(1);
        let outcomes: Vec<FileOutcome> = if threads == 1 || files.len() < 2 {
            files.iter().map(|file| self.process(file)).collect()
        } else {
            let chunk_size = files.len().div_ceil(threads);
            std::thread::scope(|scope| {
                let handles: Vec<_> = files
                    .chunks(chunk_size)
                    .map(|chunk| {
                        let handle = scope.spawn(move || {
                            chunk.iter().map(|file| self.process(file)).collect::<Vec<_>>()
                        });
                        (chunk, handle)
                    })
                    .collect();

                let mut outcomes = Vec::with_capacity(files.len());
                for (chunk, handle) in handles {
                    match handle.join() {
                        Ok(chunk_outcomes) => outcomes.extend(chunk_outcomes),
                        Err(_) => outcomes.extend(chunk.iter().map(|file| {
                            FileOutcome::Skipped(SkippedFile {
                                path: file.path.display().to_string(),
                                reason: "worker thread panicked".to_string(),
                            })
                        })),
                    }
                }
                outcomes
            })
        };

        let mut report = ExtractionReport::default();
        for outcome in outcomes {
            match outcome {
                FileOutcome::History(rows) => report.notifications.extend(rows),
                FileOutcome::Status(rows) => report.statuses.extend(rows),
                FileOutcome::Snoozed(rows) => report.snoozed.extend(rows),
                FileOutcome::Skipped(skipped) => report.skipped.push(skipped),
            }
        }

        if report.notifications.is_empty() {
            info!("No Android Notification History - Notifications available");
        }
        info!(
            files = files.len(),
            notifications = report.notifications.len(),
            statuses = report.statuses.len(),
            snoozed = report.snoozed.len(),
            skipped = report.skipped.len(),
            "extraction finished"
        );
        report
    }

    fn process(&self, file: &ArtifactFile) -> FileOutcome {
        debug!(path = %file.path.display(), kind = ?file.kind, "processing artifact");
        let result = match &file.kind {
            ArtifactKind::History { .. } => self.history_file(file).map(FileOutcome::History),
            ArtifactKind::SettingsSecure { user } => {
                read_document(&file.path).map(|doc| {
                    let rows = extract_status(&doc, user, &file.path.display().to_string());
                    if rows.is_empty() {
                        info!(path = %file.path.display(), "No Android Notification History - Status data available");
                    }
                    FileOutcome::Status(rows)
                })
            }
            ArtifactKind::NotificationPolicy => read_document(&file.path).map(|doc| {
                let rows = extract_snoozed(&doc, &file.path.display().to_string());
                if rows.is_empty() {
                    info!(path = %file.path.display(), "No Android Notification History - Snoozed notifications data available");
                }
                FileOutcome::Snoozed(rows)
            }),
        };

        result.unwrap_or_else(|err| {
            warn!(path = %file.path.display(), error = %err, "skipping artifact");
            FileOutcome::Skipped(SkippedFile {
                path: file.path.display().to_string(),
                reason: err.to_string(),
            })
        })
    }

    fn history_file(&self, file: &ArtifactFile) -> Result<Vec<NormalizedRow>> {
        let size = fs::metadata(&file.path)?.len();
        if size > self.config.max_history_file_bytes {
            return Err(Error::Other(format!(
                "history file is {} bytes, limit is {}",
                size, self.config.max_history_file_bytes
            )));
        }

        let bytes = fs::read(&file.path)?;
        let history = project_history(&bytes, &file.file_name())?;
        if history.truncated {
            warn!(path = %file.path.display(), rows = history.rows.len(), "history file is truncated");
        }
        Ok(history.rows)
    }
}

fn read_document(path: &Path) -> Result<crate::parsing::XmlDocument> {
    let bytes = fs::read(path)?;
    Ok(read_xml_document(&bytes)?)
}
