use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::{FieldValue, ImageType};

/// One fully resolved notification, ready for tabular and timeline reports.
///
/// Field order is the report column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRow {
    pub posted_time: Option<DateTime<Utc>>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub package: String,
    pub user_id: FieldValue<i32>,
    pub uid: FieldValue<i32>,
    pub package_index: FieldValue<i32>,
    pub channel_name: String,
    pub channel_name_index: FieldValue<i32>,
    pub channel_id: String,
    pub channel_id_index: FieldValue<i32>,
    pub conversation_id: String,
    pub conversation_id_index: FieldValue<i32>,
    pub major_version: Option<i32>,
    pub image_type: Option<ImageType>,
    pub image_bitmap_filename: Option<String>,
    pub image_resource_id: Option<i32>,
    pub image_resource_id_package: Option<String>,
    pub image_data_length: Option<i32>,
    pub image_data_offset: Option<i32>,
    pub image_uri: Option<String>,
    pub source_file_name: String,
    pub source_file_creation_time: Option<DateTime<Utc>>,
}

impl NormalizedRow {
    pub const HEADERS: [&'static str; 23] = [
        "Posted Time",
        "Title",
        "Text",
        "Package Name",
        "User ID",
        "UID",
        "Package Index",
        "Channel Name",
        "Channel Name Index",
        "Channel ID",
        "Channel ID Index",
        "Conversation ID",
        "Conversation ID Index",
        "Major Version",
        "Image Type",
        "Image Bitmap Filename",
        "Image Resource ID",
        "Image Resource ID Package",
        "Image Data Length",
        "Image Data Offset",
        "Image URI",
        "Protobuf File Name",
        "Protobuf File Creation Date",
    ];

    pub fn has_icon(&self) -> bool {
        self.image_type.is_some()
            || self.image_bitmap_filename.is_some()
            || self.image_resource_id.is_some()
            || self.image_resource_id_package.is_some()
            || self.image_data_length.is_some()
            || self.image_data_offset.is_some()
            || self.image_uri.is_some()
    }
}
