//! Message definitions for the notification history protobuf container.
//!
//! These mirror `NotificationHistoryProto` as written by the Android
//! notification history service. The string pool and icon messages are decoded
//! strictly through these types; notifications go through the field-tolerant
//! reader in [`super::history_parser`]. The full message is also used to build
//! history files, e.g. for fixtures.

/// Top-level message of one history file.
#[derive(Clone, PartialEq, prost::Message)]
pub struct NotificationHistoryProto {
    #[prost(message, optional, tag = "1")]
    pub string_pool: Option<StringPoolProto>,
    #[prost(int32, optional, tag = "2")]
    pub major_version: Option<i32>,
    #[prost(message, repeated, tag = "3")]
    pub notification: Vec<NotificationProto>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StringPoolProto {
    #[prost(int32, optional, tag = "1")]
    pub size: Option<i32>,
    #[prost(string, repeated, tag = "2")]
    pub strings: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct NotificationProto {
    #[prost(string, optional, tag = "1")]
    pub package: Option<String>,
    #[prost(int32, optional, tag = "2")]
    pub package_index: Option<i32>,
    #[prost(string, optional, tag = "3")]
    pub channel_name: Option<String>,
    #[prost(int32, optional, tag = "4")]
    pub channel_name_index: Option<i32>,
    #[prost(string, optional, tag = "5")]
    pub channel_id: Option<String>,
    #[prost(int32, optional, tag = "6")]
    pub channel_id_index: Option<i32>,
    #[prost(int32, optional, tag = "7")]
    pub uid: Option<i32>,
    #[prost(int32, optional, tag = "8")]
    pub user_id: Option<i32>,
    #[prost(int64, optional, tag = "9")]
    pub posted_time_ms: Option<i64>,
    #[prost(string, optional, tag = "10")]
    pub title: Option<String>,
    #[prost(string, optional, tag = "11")]
    pub text: Option<String>,
    #[prost(message, optional, tag = "12")]
    pub icon: Option<IconProto>,
    #[prost(string, optional, tag = "13")]
    pub conversation_id: Option<String>,
    #[prost(int32, optional, tag = "14")]
    pub conversation_id_index: Option<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct IconProto {
    #[prost(enumeration = "ImageTypeEnum", optional, tag = "1")]
    pub image_type: Option<i32>,
    #[prost(string, optional, tag = "2")]
    pub image_bitmap_filename: Option<String>,
    #[prost(int32, optional, tag = "3")]
    pub image_resource_id: Option<i32>,
    #[prost(string, optional, tag = "4")]
    pub image_resource_id_package: Option<String>,
    #[prost(bytes = "vec", optional, tag = "5")]
    pub image_data: Option<Vec<u8>>,
    #[prost(int32, optional, tag = "6")]
    pub image_data_length: Option<i32>,
    #[prost(int32, optional, tag = "7")]
    pub image_data_offset: Option<i32>,
    #[prost(string, optional, tag = "8")]
    pub image_uri: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ImageTypeEnum {
    TypeUnknown = 0,
    TypeBitmap = 1,
    TypeResource = 2,
    TypeData = 3,
    TypeUri = 4,
    TypeAdaptiveBitmap = 5,
    TypeUriAdaptiveBitmap = 6,
}
