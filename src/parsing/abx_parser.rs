//! Reader for Android Binary XML ("ABX"), the format newer Android releases
//! use for `settings_secure.xml` and `notification_policy.xml`.
//!
//! A document is the magic `ABX\0` followed by tokens. Each token byte packs a
//! value type in the high nibble and a command in the low nibble. All numbers
//! are big-endian; strings are a u16 length followed by UTF-8 bytes. Element
//! and attribute names are interned: a u16 index into a table built while
//! reading, where `0xFFFF` introduces a new string.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use crate::parsing::xml_parser::{TreeBuilder, XmlDocument, XmlElement, XmlError};

pub const ABX_MAGIC: [u8; 4] = [0x41, 0x42, 0x58, 0x00];

const START_DOCUMENT: u8 = 0;
const END_DOCUMENT: u8 = 1;
const START_TAG: u8 = 2;
const END_TAG: u8 = 3;
const TEXT: u8 = 4;
const CDSECT: u8 = 5;
const ENTITY_REF: u8 = 6;
const IGNORABLE_WHITESPACE: u8 = 7;
const PROCESSING_INSTRUCTION: u8 = 8;
const COMMENT: u8 = 9;
const DOCDECL: u8 = 10;
const ATTRIBUTE: u8 = 15;

const TYPE_NULL: u8 = 1 << 4;
const TYPE_STRING: u8 = 2 << 4;
const TYPE_STRING_INTERNED: u8 = 3 << 4;
const TYPE_BYTES_HEX: u8 = 4 << 4;
const TYPE_BYTES_BASE64: u8 = 5 << 4;
const TYPE_INT: u8 = 6 << 4;
const TYPE_INT_HEX: u8 = 7 << 4;
const TYPE_LONG: u8 = 8 << 4;
const TYPE_LONG_HEX: u8 = 9 << 4;
const TYPE_FLOAT: u8 = 10 << 4;
const TYPE_DOUBLE: u8 = 11 << 4;
const TYPE_BOOLEAN_TRUE: u8 = 12 << 4;
const TYPE_BOOLEAN_FALSE: u8 = 13 << 4;

const NEW_INTERNED_STRING: u16 = 0xFFFF;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AbxError {
    #[error("missing ABX magic header")]
    BadMagic,

    #[error("unexpected end of data at byte {0}")]
    UnexpectedEof(usize),

    #[error("interned string index {index} out of range at byte {offset}")]
    BadInternedIndex { index: u16, offset: usize },

    #[error("unknown value type {kind:#04x} at byte {offset}")]
    UnknownType { kind: u8, offset: usize },

    #[error("unknown command {command} at byte {offset}")]
    UnknownCommand { command: u8, offset: usize },

    #[error("string at byte {0} is not valid UTF-8")]
    InvalidUtf8(usize),

    #[error("element structure: {0}")]
    Structure(String),
}

pub fn is_abx(bytes: &[u8]) -> bool {
    bytes.starts_with(&ABX_MAGIC)
}

struct AbxReader<'a> {
    data: &'a [u8],
    pos: usize,
    interned: Vec<String>,
}

impl<'a> AbxReader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], AbxError> {
        let end = self.pos.checked_add(n).ok_or(AbxError::UnexpectedEof(self.pos))?;
        let slice = self.data.get(self.pos..end).ok_or(AbxError::UnexpectedEof(self.pos))?;
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, AbxError> {
        Ok(self.take(1)?[0])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], AbxError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn read_u16(&mut self) -> Result<u16, AbxError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    fn read_utf(&mut self) -> Result<String, AbxError> {
        let len = self.read_u16()? as usize;
        let start = self.pos;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes).map(str::to_string).map_err(|_| AbxError::InvalidUtf8(start))
    }

    fn read_interned(&mut self) -> Result<String, AbxError> {
        let offset = self.pos;
        let index = self.read_u16()?;
        if index == NEW_INTERNED_STRING {
            let value = self.read_utf()?;
            self.interned.push(value.clone());
            return Ok(value);
        }
        self.interned
            .get(index as usize)
            .cloned()
            .ok_or(AbxError::BadInternedIndex { index, offset })
    }

    fn read_bytes(&mut self) -> Result<&'a [u8], AbxError> {
        let len = self.read_u16()? as usize;
        self.take(len)
    }

    /// Read a typed value and render it the way Android's pull parser does.
    fn read_value(&mut self, kind: u8, offset: usize) -> Result<Option<String>, AbxError> {
        let value = match kind {
            TYPE_NULL => return Ok(None),
            TYPE_STRING => self.read_utf()?,
            TYPE_STRING_INTERNED => self.read_interned()?,
            TYPE_BYTES_HEX => {
                self.read_bytes()?.iter().map(|b| format!("{:02X}", b)).collect::<String>()
            }
            TYPE_BYTES_BASE64 => STANDARD.encode(self.read_bytes()?),
            TYPE_INT => i32::from_be_bytes(self.read_array()?).to_string(),
            TYPE_INT_HEX => format!("{:x}", u32::from_be_bytes(self.read_array()?)),
            TYPE_LONG => i64::from_be_bytes(self.read_array()?).to_string(),
            TYPE_LONG_HEX => format!("{:x}", u64::from_be_bytes(self.read_array()?)),
            TYPE_FLOAT => f32::from_be_bytes(self.read_array()?).to_string(),
            TYPE_DOUBLE => f64::from_be_bytes(self.read_array()?).to_string(),
            TYPE_BOOLEAN_TRUE => "true".to_string(),
            TYPE_BOOLEAN_FALSE => "false".to_string(),
            other => return Err(AbxError::UnknownType { kind: other, offset }),
        };
        Ok(Some(value))
    }
}

fn structure(err: XmlError) -> AbxError {
    AbxError::Structure(err.to_string())
}

/// Parse a complete ABX document into an element tree.
pub fn parse_abx(bytes: &[u8]) -> Result<XmlDocument, AbxError> {
    if !is_abx(bytes) {
        return Err(AbxError::BadMagic);
    }

    let mut reader = AbxReader { data: bytes, pos: ABX_MAGIC.len(), interned: Vec::new() };
    let mut builder = TreeBuilder::default();

    while reader.pos < bytes.len() {
        let offset = reader.pos;
        let token = reader.read_u8()?;
        let command = token & 0x0f;
        let kind = token & 0xf0;

        match command {
            START_DOCUMENT => {}
            END_DOCUMENT => break,
            START_TAG => {
                let name = reader.read_interned()?;
                builder.start(XmlElement::new(name));
            }
            END_TAG => {
                let name = reader.read_interned()?;
                builder.end(&name).map_err(structure)?;
            }
            ATTRIBUTE => {
                let name = reader.read_interned()?;
                if let Some(value) = reader.read_value(kind, offset)? {
                    builder.attribute(name, value);
                }
            }
            TEXT | CDSECT | IGNORABLE_WHITESPACE => {
                if let Some(text) = reader.read_value(kind, offset)? {
                    builder.text(&text);
                }
            }
            ENTITY_REF | PROCESSING_INSTRUCTION | COMMENT | DOCDECL => {
                reader.read_value(kind, offset)?;
            }
            other => return Err(AbxError::UnknownCommand { command: other, offset }),
        }
    }

    builder.finish().map_err(structure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf(out: &mut Vec<u8>, value: &str) {
        out.extend_from_slice(&(value.len() as u16).to_be_bytes());
        out.extend_from_slice(value.as_bytes());
    }

    fn new_interned(out: &mut Vec<u8>, value: &str) {
        out.extend_from_slice(&NEW_INTERNED_STRING.to_be_bytes());
        utf(out, value);
    }

    #[test]
    fn test_rejects_missing_magic() {
        assert_eq!(parse_abx(b"<xml/>"), Err(AbxError::BadMagic));
    }

    #[test]
    fn test_typed_attributes() {
        let mut doc = ABX_MAGIC.to_vec();
        doc.push(TYPE_NULL | START_DOCUMENT);
        doc.push(TYPE_STRING_INTERNED | START_TAG);
        new_interned(&mut doc, "item");
        doc.push(TYPE_INT | ATTRIBUTE);
        new_interned(&mut doc, "count");
        doc.extend_from_slice(&(-5i32).to_be_bytes());
        doc.push(TYPE_INT_HEX | ATTRIBUTE);
        new_interned(&mut doc, "flags");
        doc.extend_from_slice(&255i32.to_be_bytes());
        doc.push(TYPE_LONG | ATTRIBUTE);
        new_interned(&mut doc, "time");
        doc.extend_from_slice(&1_700_000_000_000i64.to_be_bytes());
        doc.push(TYPE_BOOLEAN_TRUE | ATTRIBUTE);
        new_interned(&mut doc, "on");
        doc.push(TYPE_BYTES_HEX | ATTRIBUTE);
        new_interned(&mut doc, "hex");
        doc.extend_from_slice(&2u16.to_be_bytes());
        doc.extend_from_slice(&[0xab, 0x01]);
        doc.push(TYPE_BYTES_BASE64 | ATTRIBUTE);
        new_interned(&mut doc, "b64");
        doc.extend_from_slice(&3u16.to_be_bytes());
        doc.extend_from_slice(b"abc");
        doc.push(TYPE_STRING_INTERNED | END_TAG);
        doc.extend_from_slice(&0u16.to_be_bytes());
        doc.push(TYPE_NULL | END_DOCUMENT);

        let parsed = parse_abx(&doc).unwrap();
        let item = &parsed.roots[0];
        assert_eq!(item.name, "item");
        assert_eq!(item.attribute("count"), Some("-5"));
        assert_eq!(item.attribute("flags"), Some("ff"));
        assert_eq!(item.attribute("time"), Some("1700000000000"));
        assert_eq!(item.attribute("on"), Some("true"));
        assert_eq!(item.attribute("hex"), Some("AB01"));
        assert_eq!(item.attribute("b64"), Some("YWJj"));
    }

    #[test]
    fn test_bad_interned_index() {
        let mut doc = ABX_MAGIC.to_vec();
        doc.push(TYPE_STRING_INTERNED | START_TAG);
        doc.extend_from_slice(&7u16.to_be_bytes());
        assert_eq!(
            parse_abx(&doc),
            Err(AbxError::BadInternedIndex { index: 7, offset: 5 })
        );
    }

    #[test]
    fn test_truncated_document() {
        let mut doc = ABX_MAGIC.to_vec();
        doc.push(TYPE_STRING_INTERNED | START_TAG);
        doc.extend_from_slice(&NEW_INTERNED_STRING.to_be_bytes());
        doc.extend_from_slice(&10u16.to_be_bytes());
        doc.extend_from_slice(b"set");
        assert!(matches!(parse_abx(&doc), Err(AbxError::UnexpectedEof(_))));
    }

    #[test]
    fn test_multiple_roots() {
        let mut doc = ABX_MAGIC.to_vec();
        for _ in 0..2 {
            doc.push(TYPE_STRING_INTERNED | START_TAG);
            if doc.len() == 5 {
                new_interned(&mut doc, "settings");
            } else {
                doc.extend_from_slice(&0u16.to_be_bytes());
            }
            doc.push(TYPE_STRING_INTERNED | END_TAG);
            doc.extend_from_slice(&0u16.to_be_bytes());
        }
        let parsed = parse_abx(&doc).unwrap();
        assert_eq!(parsed.roots.len(), 2);
    }
}
