//! Discovery of artifact files on an extracted Android file system

pub mod artifact_scanner;

pub use artifact_scanner::{classify, ArtifactFile, ArtifactKind, ArtifactScanner};
