//! High-level extraction API

pub mod extractor;

pub use extractor::{project_history, ExtractionReport, Extractor, HistoryRows, SkippedFile};
