use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::report::ReportRow;

/// Tabs and line breaks inside a value would shift columns.
fn clean(cell: &str) -> String {
    cell.replace(['\t', '\r', '\n'], " ")
}

pub fn write_tsv<R: ReportRow>(dir: &Path, rows: &[R]) -> Result<PathBuf> {
    let path = dir.join(format!("{}.tsv", R::report_name()));
    let mut out = BufWriter::new(File::create(&path)?);

    writeln!(out, "{}", R::headers().join("\t"))?;
    for row in rows {
        let cells: Vec<String> = row.cells().iter().map(|c| clean(c)).collect();
        writeln!(out, "{}", cells.join("\t"))?;
    }
    out.flush()?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "wrote TSV report");
    Ok(path)
}
