//! Decoder for notification history files.
//!
//! The container is walked field by field with the protobuf wire primitives
//! instead of being decoded in one shot, so that one damaged field does not
//! cost the whole record: a field with an unexpected wire type or invalid UTF-8
//! becomes [`FieldValue::DecodeError`] and decoding moves on.

use prost::bytes::Buf;
use prost::encoding::{decode_key, decode_varint, WireType};
use prost::Message;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::{FieldValue, IconRecord, ImageType, NotificationRecord, StringPool};
use crate::parsing::history_proto::{IconProto, StringPoolProto};

/// Errors that make a history file unusable as a whole.
#[derive(Debug, Error)]
pub enum HistoryDecodeError {
    #[error("malformed history container at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },

    #[error("string pool could not be decoded: {0}")]
    StringPool(#[from] prost::DecodeError),
}

/// Contents of one history file, ready for projection.
#[derive(Debug, Clone, Default)]
pub struct DecodedHistory {
    pub string_pool: StringPool,
    pub major_version: Option<i32>,
    pub records: Vec<NotificationRecord>,
    /// Set when the container broke off after at least one record.
    pub truncated: bool,
}

#[derive(Debug, Error)]
enum WireError {
    #[error("{0}")]
    Prost(#[from] prost::DecodeError),

    #[error("field runs past the end of its buffer")]
    Truncated,

    #[error("group wire type is not supported")]
    Group,
}

/// One undecoded field value, borrowed from the input.
#[derive(Debug, Clone, Copy)]
enum RawField<'a> {
    Varint(u64),
    Fixed64(u64),
    Fixed32(u32),
    Bytes(&'a [u8]),
}

impl RawField<'_> {
    fn wire_name(&self) -> &'static str {
        match self {
            RawField::Varint(_) => "varint",
            RawField::Fixed64(_) => "fixed64",
            RawField::Fixed32(_) => "fixed32",
            RawField::Bytes(_) => "length-delimited",
        }
    }
}

fn next_field<'a>(buf: &mut &'a [u8]) -> Result<(u32, RawField<'a>), WireError> {
    let (tag, wire_type) = decode_key(buf)?;
    let field = match wire_type {
        WireType::Varint => RawField::Varint(decode_varint(buf)?),
        WireType::SixtyFourBit => {
            if buf.remaining() < 8 {
                return Err(WireError::Truncated);
            }
            RawField::Fixed64(buf.get_u64_le())
        }
        WireType::ThirtyTwoBit => {
            if buf.remaining() < 4 {
                return Err(WireError::Truncated);
            }
            RawField::Fixed32(buf.get_u32_le())
        }
        WireType::LengthDelimited => {
            let len = usize::try_from(decode_varint(buf)?).map_err(|_| WireError::Truncated)?;
            let slice: &'a [u8] = *buf;
            if slice.len() < len {
                return Err(WireError::Truncated);
            }
            let (head, tail) = slice.split_at(len);
            *buf = tail;
            RawField::Bytes(head)
        }
        WireType::StartGroup | WireType::EndGroup => return Err(WireError::Group),
    };
    Ok((tag, field))
}

/// Decode the raw bytes of one history file.
///
/// A framing error before any notification was decoded is fatal. Later ones
/// keep what was decoded and set [`DecodedHistory::truncated`].
pub fn decode_history(bytes: &[u8]) -> Result<DecodedHistory, HistoryDecodeError> {
    let mut history = DecodedHistory::default();
    let mut buf = bytes;

    while !buf.is_empty() {
        let offset = bytes.len() - buf.len();
        let (tag, field) = match next_field(&mut buf) {
            Ok(next) => next,
            Err(err) if history.records.is_empty() => {
                return Err(HistoryDecodeError::Malformed { offset, reason: err.to_string() });
            }
            Err(err) => {
                warn!(
                    offset,
                    error = %err,
                    decoded = history.records.len(),
                    "history container broke off, keeping decoded notifications"
                );
                history.truncated = true;
                break;
            }
        };

        match (tag, field) {
            (1, RawField::Bytes(data)) => {
                let pool = StringPoolProto::decode(data)?;
                if let Some(size) = pool.size {
                    if usize::try_from(size).ok() != Some(pool.strings.len()) {
                        warn!(
                            declared = size,
                            actual = pool.strings.len(),
                            "string pool size does not match its contents"
                        );
                    }
                }
                history.string_pool.extend(pool.strings);
            }
            (1, other) => {
                return Err(HistoryDecodeError::Malformed {
                    offset,
                    reason: format!("string pool stored as {}", other.wire_name()),
                });
            }
            (2, RawField::Varint(value)) => history.major_version = Some(value as i32),
            (3, RawField::Bytes(data)) => history.records.push(decode_notification(data)),
            (2 | 3, other) => {
                warn!(tag, wire = other.wire_name(), offset, "skipping field with unexpected wire type");
            }
            (tag, _) => debug!(tag, offset, "skipping unknown history field"),
        }
    }

    debug!(
        notifications = history.records.len(),
        pool = history.string_pool.len(),
        major_version = ?history.major_version,
        "decoded history container"
    );
    Ok(history)
}

fn int32_field(tag: u32, field: RawField<'_>) -> FieldValue<i32> {
    match field {
        // int32 values are sign-extended to 64 bits on the wire.
        RawField::Varint(value) => FieldValue::Present(value as i32),
        other => {
            debug!(tag, wire = other.wire_name(), "int32 field with unexpected wire type");
            FieldValue::DecodeError
        }
    }
}

fn int64_field(tag: u32, field: RawField<'_>) -> FieldValue<i64> {
    match field {
        RawField::Varint(value) => FieldValue::Present(value as i64),
        other => {
            debug!(tag, wire = other.wire_name(), "int64 field with unexpected wire type");
            FieldValue::DecodeError
        }
    }
}

fn string_field(tag: u32, field: RawField<'_>) -> FieldValue<String> {
    match field {
        RawField::Bytes(data) => match std::str::from_utf8(data) {
            Ok(text) => FieldValue::Present(text.to_string()),
            Err(err) => {
                debug!(tag, error = %err, "string field is not valid UTF-8");
                FieldValue::DecodeError
            }
        },
        other => {
            debug!(tag, wire = other.wire_name(), "string field with unexpected wire type");
            FieldValue::DecodeError
        }
    }
}

fn icon_field(field: RawField<'_>) -> Option<IconRecord> {
    let RawField::Bytes(data) = field else {
        warn!(wire = field.wire_name(), "icon stored with unexpected wire type, dropping it");
        return None;
    };
    match IconProto::decode(data) {
        Ok(icon) => Some(IconRecord {
            image_type: icon.image_type.map(ImageType::from_raw),
            image_bitmap_filename: icon.image_bitmap_filename,
            image_resource_id: icon.image_resource_id,
            image_resource_id_package: icon.image_resource_id_package,
            image_data_length: icon.image_data_length,
            image_data_offset: icon.image_data_offset,
            image_uri: icon.image_uri,
        }),
        Err(err) => {
            warn!(error = %err, "icon could not be decoded, dropping it");
            None
        }
    }
}

/// Decode one notification record. Never fails; damage is recorded per field.
pub fn decode_notification(bytes: &[u8]) -> NotificationRecord {
    let mut record = NotificationRecord::default();
    let mut buf = bytes;

    while !buf.is_empty() {
        let (tag, field) = match next_field(&mut buf) {
            Ok(next) => next,
            Err(err) => {
                warn!(
                    offset = bytes.len() - buf.len(),
                    error = %err,
                    "notification record broke off"
                );
                mark_unreadable(&mut record);
                break;
            }
        };

        match tag {
            1 => record.package = string_field(tag, field),
            2 => record.package_index = int32_field(tag, field),
            3 => record.channel_name = string_field(tag, field),
            4 => record.channel_name_index = int32_field(tag, field),
            5 => record.channel_id = string_field(tag, field),
            6 => record.channel_id_index = int32_field(tag, field),
            7 => record.uid = int32_field(tag, field),
            8 => record.user_id = int32_field(tag, field),
            9 => record.posted_time_ms = int64_field(tag, field),
            10 => record.title = string_field(tag, field),
            11 => record.text = string_field(tag, field),
            12 => record.icon = icon_field(field),
            13 => record.conversation_id = string_field(tag, field),
            14 => record.conversation_id_index = int32_field(tag, field),
            _ => debug!(tag, "skipping unknown notification field"),
        }
    }

    record
}

/// After a framing error the presence of unseen identity fields is unknown.
fn mark_unreadable(record: &mut NotificationRecord) {
    fn fail<T>(field: &mut FieldValue<T>) {
        if matches!(field, FieldValue::Absent) {
            *field = FieldValue::DecodeError;
        }
    }

    fail(&mut record.uid);
    fail(&mut record.user_id);
    fail(&mut record.package);
    fail(&mut record.package_index);
    fail(&mut record.channel_name);
    fail(&mut record.channel_name_index);
    fail(&mut record.channel_id);
    fail(&mut record.channel_id_index);
    fail(&mut record.conversation_id);
    fail(&mut record.conversation_id_index);
}
