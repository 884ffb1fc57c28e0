//! Record Projector
//!
//! Turns decoded notification records into [`NormalizedRow`]s: string pool
//! references are resolved, timestamps are converted to UTC and the icon
//! sub-record is flattened.
//!
//! # Example
//!
//! ```
//! use notihist::core::{FieldValue, NotificationRecord, StringPool};
//! use notihist::projection::RecordProjector;
//!
//! let pool = StringPool::new(vec!["com.example.app".to_string()]);
//! let record = NotificationRecord {
//!     package_index: FieldValue::Present(1),
//!     ..Default::default()
//! };
//!
//! let projector = RecordProjector::new(Some(1), "1700000000000");
//! let row = projector.project(&record, &pool);
//! assert_eq!(row.package, "com.example.app");
//! ```

use chrono::{DateTime, Utc};

use crate::core::{
    epoch_millis_to_utc, parse_epoch_millis_from_filename, FieldValue, IconRecord,
    NotificationRecord, StringPool,
};
use crate::projection::NormalizedRow;

/// Projects every record of one history file.
///
/// Holds the file-level context (format version, file name and the creation
/// time derived from it) so it is computed once per file.
#[derive(Debug, Clone)]
pub struct RecordProjector {
    major_version: Option<i32>,
    source_file_name: String,
    source_file_creation_time: Option<DateTime<Utc>>,
}

impl RecordProjector {
    pub fn new(major_version: Option<i32>, source_file_name: impl Into<String>) -> Self {
        let source_file_name = source_file_name.into();
        let source_file_creation_time =
            parse_epoch_millis_from_filename(&source_file_name).and_then(epoch_millis_to_utc);
        Self { major_version, source_file_name, source_file_creation_time }
    }

    pub fn source_file_creation_time(&self) -> Option<DateTime<Utc>> {
        self.source_file_creation_time
    }

    /// Project one record against the file's string pool. Never fails.
    pub fn project(&self, record: &NotificationRecord, pool: &StringPool) -> NormalizedRow {
        let icon = record.icon.clone().unwrap_or_default();
        let IconRecord {
            image_type,
            image_bitmap_filename,
            image_resource_id,
            image_resource_id_package,
            image_data_length,
            image_data_offset,
            image_uri,
        } = icon;

        NormalizedRow {
            posted_time: record.posted_time_ms.clone().ok().and_then(epoch_millis_to_utc),
            title: record.title.clone().ok(),
            text: record.text.clone().ok(),
            package: resolve_pair(pool, &record.package, &record.package_index),
            user_id: record.user_id.clone(),
            uid: record.uid.clone(),
            package_index: record.package_index.clone(),
            channel_name: resolve_pair(pool, &record.channel_name, &record.channel_name_index),
            channel_name_index: record.channel_name_index.clone(),
            channel_id: resolve_pair(pool, &record.channel_id, &record.channel_id_index),
            channel_id_index: record.channel_id_index.clone(),
            conversation_id: resolve_pair(
                pool,
                &record.conversation_id,
                &record.conversation_id_index,
            ),
            conversation_id_index: record.conversation_id_index.clone(),
            major_version: self.major_version,
            image_type,
            image_bitmap_filename,
            image_resource_id,
            image_resource_id_package,
            image_data_length,
            image_data_offset,
            image_uri,
            source_file_name: self.source_file_name.clone(),
            source_file_creation_time: self.source_file_creation_time,
        }
    }

    pub fn project_all<'a>(
        &self,
        records: impl IntoIterator<Item = &'a NotificationRecord>,
        pool: &StringPool,
    ) -> Vec<NormalizedRow> {
        records.into_iter().map(|record| self.project(record, pool)).collect()
    }
}

/// A direct value wins when non-empty; otherwise the index is looked up.
fn resolve_pair(pool: &StringPool, direct: &FieldValue<String>, index: &FieldValue<i32>) -> String {
    let direct = match direct {
        FieldValue::Present(value) => Some(value.as_str()),
        FieldValue::Absent | FieldValue::DecodeError => None,
    };
    let index = match index {
        FieldValue::Present(value) => Some(*value),
        FieldValue::Absent | FieldValue::DecodeError => None,
    };
    pool.resolve_or_direct(direct, index)
}

/// Project a single record with an ad-hoc file context.
pub fn project(
    record: &NotificationRecord,
    pool: &StringPool,
    major_version: Option<i32>,
    source_file_name: &str,
) -> NormalizedRow {
    RecordProjector::new(major_version, source_file_name).project(record, pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ImageType;
    use chrono::TimeZone;

    fn pool() -> StringPool {
        StringPool::new(vec![
            "General".to_string(),
            "Alerts".to_string(),
            "com.example.app".to_string(),
        ])
    }

    #[test]
    fn test_resolves_indexed_fields_independently() {
        let record = NotificationRecord {
            package: FieldValue::Present(String::new()),
            package_index: FieldValue::Present(3),
            channel_name: FieldValue::Present(String::new()),
            channel_name_index: FieldValue::Present(1),
            channel_id: FieldValue::Present("direct_id".to_string()),
            channel_id_index: FieldValue::Present(2),
            conversation_id_index: FieldValue::Present(7),
            posted_time_ms: FieldValue::Present(1_700_000_000_000),
            ..Default::default()
        };

        let row = project(&record, &pool(), Some(1), "1700000000000");

        assert_eq!(row.package, "com.example.app");
        assert_eq!(row.channel_name, "General");
        assert_eq!(row.channel_name_index, FieldValue::Present(1));
        assert_eq!(row.channel_id, "direct_id");
        assert_eq!(row.channel_id_index, FieldValue::Present(2));
        assert_eq!(row.conversation_id, "");
        assert_eq!(row.conversation_id_index, FieldValue::Present(7));
        assert_eq!(
            row.posted_time,
            Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap())
        );
    }

    #[test]
    fn test_failed_direct_value_falls_back_to_index() {
        let record = NotificationRecord {
            package: FieldValue::DecodeError,
            package_index: FieldValue::Present(2),
            ..Default::default()
        };
        assert_eq!(project(&record, &pool(), None, "x").package, "Alerts");
    }

    #[test]
    fn test_icon_copied_verbatim() {
        let icon = IconRecord {
            image_type: Some(ImageType::Resource),
            image_resource_id: Some(0x7f08_0001),
            image_resource_id_package: Some("com.example.app".to_string()),
            ..Default::default()
        };
        let record = NotificationRecord { icon: Some(icon), ..Default::default() };
        let row = project(&record, &pool(), Some(1), "1700000000000");

        assert!(row.has_icon());
        assert_eq!(row.image_type, Some(ImageType::Resource));
        assert_eq!(row.image_resource_id, Some(0x7f08_0001));
        assert_eq!(row.image_resource_id_package.as_deref(), Some("com.example.app"));
        assert_eq!(row.image_bitmap_filename, None);
        assert_eq!(row.image_data_length, None);
        assert_eq!(row.image_data_offset, None);
        assert_eq!(row.image_uri, None);
    }

    #[test]
    fn test_projector_context_is_shared() {
        let projector = RecordProjector::new(Some(1), "not-a-number");
        let records = vec![NotificationRecord::default(), NotificationRecord::default()];
        let rows = projector.project_all(&records, &pool());
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.source_file_creation_time.is_none()));
        assert!(rows.iter().all(|r| r.source_file_name == "not-a-number"));
        assert!(rows.iter().all(|r| r.major_version == Some(1)));
    }
}
