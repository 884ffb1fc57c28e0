//! Notification history status and snoozed notifications, read from
//! `settings_secure.xml` and `notification_policy.xml`

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::core::epoch_millis_to_utc;
use crate::parsing::xml_parser::XmlDocument;

pub const HISTORY_ENABLED_SETTING: &str = "notification_history_enabled";

/// Whether the notification history feature is switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HistoryStatus {
    Enabled,
    Disabled,
    Unknown,
}

impl HistoryStatus {
    pub fn from_setting_value(value: Option<&str>) -> Self {
        match value {
            Some("1") => HistoryStatus::Enabled,
            Some("0") => HistoryStatus::Disabled,
            _ => HistoryStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryStatus::Enabled => "Enabled",
            HistoryStatus::Disabled => "Disabled",
            HistoryStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRow {
    pub status: HistoryStatus,
    pub user: String,
    pub source_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnoozedRow {
    pub reminder_time: Option<DateTime<Utc>>,
    pub key: String,
    pub source_file: String,
}

/// Status rows for every `notification_history_enabled` setting in the document.
pub fn extract_status(document: &XmlDocument, user: &str, source_file: &str) -> Vec<StatusRow> {
    document
        .elements()
        .into_iter()
        .filter(|element| element.name == "setting")
        .filter(|element| element.attribute("name") == Some(HISTORY_ENABLED_SETTING))
        .map(|element| StatusRow {
            status: HistoryStatus::from_setting_value(element.attribute("value")),
            user: user.to_string(),
            source_file: source_file.to_string(),
        })
        .collect()
}

/// Snoozed notifications listed under `<snoozed-notifications>`.
pub fn extract_snoozed(document: &XmlDocument, source_file: &str) -> Vec<SnoozedRow> {
    let mut rows = Vec::new();

    for root in &document.roots {
        for section in root.children.iter().filter(|c| c.name == "snoozed-notifications") {
            for notification in section.children.iter().filter(|c| c.name == "notification") {
                let raw_time = notification.attribute("time");
                let reminder_time = raw_time
                    .and_then(|t| t.trim().parse::<i64>().ok())
                    .and_then(epoch_millis_to_utc);
                if reminder_time.is_none() {
                    warn!(time = ?raw_time, source_file, "snoozed notification without a usable time");
                }
                rows.push(SnoozedRow {
                    reminder_time,
                    key: notification.attribute("key").unwrap_or_default().to_string(),
                    source_file: source_file.to_string(),
                });
            }
        }
    }

    rows
}
