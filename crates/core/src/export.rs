//! CSV rendering for the analytics export.
//!
//! Text fields are written as JSON string literals, which quotes them and
//! escapes embedded quotes, commas and newlines in one go.

use crate::types::Timestamp;

pub const VIEWS_CSV_HEADER: &str = "createdAt,projectSlug,path,referrer,deviceType";

/// One exported view, borrowed from whatever row type the caller holds.
#[derive(Debug, Clone, Copy)]
pub struct ViewCsvRow<'a> {
    pub created_at: Timestamp,
    pub project_slug: &'a str,
    pub path: Option<&'a str>,
    pub referrer: Option<&'a str>,
    pub device_type: Option<&'a str>,
}

fn quoted(value: Option<&str>) -> String {
    serde_json::Value::from(value.unwrap_or_default()).to_string()
}

/// Render a single CSV line (no trailing newline).
pub fn view_csv_line(row: &ViewCsvRow<'_>) -> String {
    [
        row.created_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        row.project_slug.to_string(),
        quoted(row.path),
        quoted(row.referrer),
        quoted(row.device_type),
    ]
    .join(",")
}

/// Render the full document: header line followed by one line per row.
pub fn views_csv<'a, I>(rows: I) -> String
where
    I: IntoIterator<Item = ViewCsvRow<'a>>,
{
    let mut out = String::from(VIEWS_CSV_HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(&view_csv_line(&row));
    }
    out
}
