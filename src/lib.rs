//! # notihist
//!
//! notihist extracts the Android notification history artifacts from an
//! extracted data partition and turns them into reports.
//!
//! Three artifacts are read:
//!
//! - `system_ce/<user>/notification_history/history/<epoch-ms>`: protobuf
//!   history files, one row per notification
//! - `system/users/<user>/settings_secure.xml`: whether the feature is enabled
//! - `system/notification_policy.xml`: snoozed notifications
//!
//! The settings files may be stored as text XML or Android Binary XML.
//!
//! ## Example
//!
//! ```rust
//! use notihist::core::{FieldValue, NotificationRecord, StringPool};
//! use notihist::projection::project;
//!
//! let pool = StringPool::new(vec!["General".to_string()]);
//! let record = NotificationRecord {
//!     package: FieldValue::Present("com.example.app".to_string()),
//!     channel_name_index: FieldValue::Present(1),
//!     ..Default::default()
//! };
//!
//! let row = project(&record, &pool, Some(1), "1700000000000");
//! assert_eq!(row.package, "com.example.app");
//! assert_eq!(row.channel_name, "General");
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::new_without_default)]

/// Record types, the string pool and timestamp conversions
pub mod core;

/// Decoders for history files and settings XML
pub mod parsing;

/// Projection of decoded records into report rows
pub mod projection;

/// Artifact discovery
pub mod sources;

/// Extraction pipeline
pub mod api;

/// Configuration structures
pub mod config;

/// Report writers
pub mod report;

/// HTTP API
pub mod http;

pub mod error {
    //! Error types and result definitions

    use std::fmt;

    use crate::parsing::{HistoryDecodeError, XmlError};

    /// Result type alias for notihist operations
    pub type Result<T> = std::result::Result<T, Error>;

    /// Main error type for notihist
    #[derive(Debug)]
    pub enum Error {
        /// Configuration error
        Config(String),
        /// History file could not be decoded
        Decode(HistoryDecodeError),
        /// Settings or policy XML could not be read
        Xml(XmlError),
        /// Report could not be written
        Report(String),
        /// IO error
        Io(std::io::Error),
        /// Other error
        Other(String),
    }

    impl fmt::Display for Error {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Error::Config(msg) => write!(f, "Configuration error: {}", msg),
                Error::Decode(err) => write!(f, "Decode error: {}", err),
                Error::Xml(err) => write!(f, "XML error: {}", err),
                Error::Report(msg) => write!(f, "Report error: {}", msg),
                Error::Io(err) => write!(f, "IO error: {}", err),
                Error::Other(msg) => write!(f, "Error: {}", msg),
            }
        }
    }

    impl std::error::Error for Error {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                Error::Decode(err) => Some(err),
                Error::Xml(err) => Some(err),
                Error::Io(err) => Some(err),
                _ => None,
            }
        }
    }

    impl From<std::io::Error> for Error {
        fn from(err: std::io::Error) -> Self {
            Error::Io(err)
        }
    }

    impl From<HistoryDecodeError> for Error {
        fn from(err: HistoryDecodeError) -> Self {
            Error::Decode(err)
        }
    }

    impl From<XmlError> for Error {
        fn from(err: XmlError) -> Self {
            Error::Xml(err)
        }
    }

    impl From<serde_json::Error> for Error {
        fn from(err: serde_json::Error) -> Self {
            Error::Report(err.to_string())
        }
    }
}

// Re-export commonly used types
pub use api::{ExtractionReport, Extractor};
pub use error::{Error, Result};
pub use projection::{NormalizedRow, RecordProjector};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config("test error".to_string());
        assert_eq!(format!("{}", err), "Configuration error: test error");
    }
}
