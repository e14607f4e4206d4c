use std::fs;
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;

use crate::core::errors::{Result, RollcallError};
use crate::core::models::report::ReportRow;

/// Placeholder for members with no recorded message.
const NEVER_SEEN: &str = "N/A";

/// Writes the activity report as a two-column CSV file.
///
/// The file always starts with a `username,last_seen` header; timestamps
/// are RFC 3339 in UTC, truncated to whole seconds. A previous report at
/// the same path is replaced wholesale, never appended to.
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `rows` to the report file, creating parent directories as
    /// needed.
    pub fn export(&self, rows: &[ReportRow]) -> Result<()> {
        let mut body = String::from("username,last_seen\n");
        for row in rows {
            let stamp = match &row.last_seen {
                Some(at) => at.to_rfc3339_opts(SecondsFormat::Secs, true),
                None => NEVER_SEEN.to_string(),
            };
            body.push_str(&escape(&row.name));
            body.push(',');
            body.push_str(&escape(&stamp));
            body.push('\n');
        }

        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| RollcallError::ReportWrite {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        }

        fs::write(&self.path, body).map_err(|e| RollcallError::ReportWrite {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}

/// Quote a field that contains a delimiter, quote, or line break,
/// doubling any embedded quotes.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
