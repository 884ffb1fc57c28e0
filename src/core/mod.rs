//! Core data structures for decoded notification history records

use serde::{Serialize, Serializer};
use std::fmt;

/// Value of a single field read from a decoded record.
///
/// `Absent` and `DecodeError` are kept apart: the first means the record did not
/// carry the field, the second means the field was there but could not be read.
/// Neither is ever collapsed into a zero or empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<T> {
    Present(T),
    Absent,
    DecodeError,
}

/// Text written in place of a field whose retrieval failed.
pub const ERROR_MARKER: &str = "Error";

impl<T> FieldValue<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, FieldValue::Present(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FieldValue::DecodeError)
    }

    pub fn as_ref(&self) -> FieldValue<&T> {
        match self {
            FieldValue::Present(value) => FieldValue::Present(value),
            FieldValue::Absent => FieldValue::Absent,
            FieldValue::DecodeError => FieldValue::DecodeError,
        }
    }

    /// Drops the distinction between absent and failed.
    pub fn ok(self) -> Option<T> {
        match self {
            FieldValue::Present(value) => Some(value),
            FieldValue::Absent | FieldValue::DecodeError => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldValue<U> {
        match self {
            FieldValue::Present(value) => FieldValue::Present(f(value)),
            FieldValue::Absent => FieldValue::Absent,
            FieldValue::DecodeError => FieldValue::DecodeError,
        }
    }
}

impl<T> Default for FieldValue<T> {
    fn default() -> Self {
        FieldValue::Absent
    }
}

impl<T> From<Option<T>> for FieldValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => FieldValue::Present(value),
            None => FieldValue::Absent,
        }
    }
}

impl<T: fmt::Display> fmt::Display for FieldValue<T> {
    /// Report cell form: value, empty for absent, the error marker otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Present(value) => write!(f, "{}", value),
            FieldValue::Absent => Ok(()),
            FieldValue::DecodeError => f.write_str(ERROR_MARKER),
        }
    }
}

impl<T: Serialize> Serialize for FieldValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Present(value) => value.serialize(serializer),
            FieldValue::Absent => serializer.serialize_none(),
            FieldValue::DecodeError => serializer.serialize_str(ERROR_MARKER),
        }
    }
}

/// Icon kinds as stored by the notification history service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Unknown,
    Bitmap,
    Resource,
    Data,
    Uri,
    AdaptiveBitmap,
    UriAdaptiveBitmap,
    Other(i32),
}

impl ImageType {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => ImageType::Unknown,
            1 => ImageType::Bitmap,
            2 => ImageType::Resource,
            3 => ImageType::Data,
            4 => ImageType::Uri,
            5 => ImageType::AdaptiveBitmap,
            6 => ImageType::UriAdaptiveBitmap,
            other => ImageType::Other(other),
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            ImageType::Unknown => 0,
            ImageType::Bitmap => 1,
            ImageType::Resource => 2,
            ImageType::Data => 3,
            ImageType::Uri => 4,
            ImageType::AdaptiveBitmap => 5,
            ImageType::UriAdaptiveBitmap => 6,
            ImageType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageType::Unknown => f.write_str("TYPE_UNKNOWN"),
            ImageType::Bitmap => f.write_str("TYPE_BITMAP"),
            ImageType::Resource => f.write_str("TYPE_RESOURCE"),
            ImageType::Data => f.write_str("TYPE_DATA"),
            ImageType::Uri => f.write_str("TYPE_URI"),
            ImageType::AdaptiveBitmap => f.write_str("TYPE_ADAPTIVE_BITMAP"),
            ImageType::UriAdaptiveBitmap => f.write_str("TYPE_URI_ADAPTIVE_BITMAP"),
            ImageType::Other(raw) => write!(f, "{}", raw),
        }
    }
}

impl Serialize for ImageType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Icon attached to a notification. Optional fields stay optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconRecord {
    pub image_type: Option<ImageType>,
    pub image_bitmap_filename: Option<String>,
    pub image_resource_id: Option<i32>,
    pub image_resource_id_package: Option<String>,
    pub image_data_length: Option<i32>,
    pub image_data_offset: Option<i32>,
    pub image_uri: Option<String>,
}

/// One notification as decoded from a history file, before string pool resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationRecord {
    pub uid: FieldValue<i32>,
    pub user_id: FieldValue<i32>,
    pub package: FieldValue<String>,
    pub package_index: FieldValue<i32>,
    pub channel_name: FieldValue<String>,
    pub channel_name_index: FieldValue<i32>,
    pub channel_id: FieldValue<String>,
    pub channel_id_index: FieldValue<i32>,
    pub conversation_id: FieldValue<String>,
    pub conversation_id_index: FieldValue<i32>,
    pub posted_time_ms: FieldValue<i64>,
    pub title: FieldValue<String>,
    pub text: FieldValue<String>,
    pub icon: Option<IconRecord>,
}

pub mod string_pool;
pub mod timestamp;

pub use string_pool::StringPool;
pub use timestamp::{epoch_millis_to_utc, format_report_time, parse_epoch_millis_from_filename};
