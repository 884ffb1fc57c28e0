//! Decoders for the raw artifact files

pub mod abx_parser;
pub mod history_parser;
pub mod history_proto;
pub mod settings_parser;
pub mod xml_parser;

pub use history_parser::{decode_history, DecodedHistory, HistoryDecodeError};
pub use settings_parser::{extract_snoozed, extract_status, HistoryStatus, SnoozedRow, StatusRow};
pub use xml_parser::{read_xml_document, XmlDocument, XmlElement, XmlError};
