//! Configuration structures for extraction and reporting

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Number of worker threads; history files are partitioned across them.
    pub worker_threads: usize,
    /// History files larger than this are skipped.
    pub max_history_file_bytes: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self { worker_threads: 1, max_history_file_bytes: 64 * 1024 * 1024 }
    }
}

/// Output formats of the report writers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Html,
    Tsv,
    Timeline,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Html, ReportFormat::Tsv, ReportFormat::Timeline];
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "html" => Ok(ReportFormat::Html),
            "tsv" => Ok(ReportFormat::Tsv),
            "timeline" => Ok(ReportFormat::Timeline),
            other => Err(Error::Config(format!(
                "Unknown report format: {}. Use 'html', 'tsv' or 'timeline'",
                other
            ))),
        }
    }
}

/// Parse a comma-separated list such as `html,tsv`.
pub fn parse_formats(list: &str) -> Result<Vec<ReportFormat>, Error> {
    let mut formats = Vec::new();
    for part in list.split(',').filter(|p| !p.trim().is_empty()) {
        let format = part.parse::<ReportFormat>()?;
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    if formats.is_empty() {
        return Err(Error::Config("No report format selected".to_string()));
    }
    Ok(formats)
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub formats: Vec<ReportFormat>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { output_dir: PathBuf::from("./reports"), formats: ReportFormat::ALL.to_vec() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!(
            parse_formats("html, TSV,html").unwrap(),
            vec![ReportFormat::Html, ReportFormat::Tsv]
        );
        assert!(parse_formats("pdf").is_err());
        assert!(parse_formats(" , ").is_err());
    }
}
