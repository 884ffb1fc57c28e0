//! Projection of decoded records into report rows

pub mod normalized_row;
pub mod record_projector;

pub use normalized_row::NormalizedRow;
pub use record_projector::{project, RecordProjector};
