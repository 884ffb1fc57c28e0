use quick_xml::escape::escape;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::report::ReportRow;

/// Render a standalone HTML page with one table.
pub fn render_html<R: ReportRow>(rows: &[R]) -> Result<String> {
    let title = R::report_name();
    let mut page = String::new();
    let fmt_err = |e: std::fmt::Error| Error::Report(e.to_string());

    writeln!(page, "<!DOCTYPE html>").map_err(fmt_err)?;
    writeln!(page, "<html><head><meta charset=\"utf-8\"><title>{}</title>", escape(&title))
        .map_err(fmt_err)?;
    writeln!(
        page,
        "<style>table{{border-collapse:collapse}}td,th{{border:1px solid #999;padding:4px;vertical-align:top}}</style>"
    )
    .map_err(fmt_err)?;
    writeln!(page, "</head><body>").map_err(fmt_err)?;
    writeln!(page, "<h1>{}</h1>", escape(&title)).map_err(fmt_err)?;
    writeln!(page, "<p>{}</p>", escape(R::DESCRIPTION)).map_err(fmt_err)?;
    writeln!(page, "<p>Total entries: {}</p>", rows.len()).map_err(fmt_err)?;

    page.push_str("<table>\n<thead><tr>");
    for header in R::headers() {
        write!(page, "<th>{}</th>", escape(*header)).map_err(fmt_err)?;
    }
    page.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        page.push_str("<tr>");
        for cell in row.cells() {
            write!(page, "<td>{}</td>", escape(&cell)).map_err(fmt_err)?;
        }
        page.push_str("</tr>\n");
    }
    page.push_str("</tbody>\n</table>\n</body></html>\n");
    Ok(page)
}

pub fn write_html<R: ReportRow>(dir: &Path, rows: &[R]) -> Result<PathBuf> {
    let path = dir.join(format!("{}.html", R::report_name()));
    fs::write(&path, render_html(rows)?)?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "wrote HTML report");
    Ok(path)
}
