//! Dates in file names and the add-date operation.
//!
//! Dates are always `YYYY-MM-DD`. Split uses the first date in a file name
//! to build output names; add-date appends a date as a new last field of
//! every record.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::codec;
use crate::error::{PnxError, Result};
use crate::report::{file_label, BatchReport};
use crate::text::{is_blank, normalize_text, FIELD_SEPARATOR};

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("date pattern is valid"));

/// First `YYYY-MM-DD` occurrence in `name`.
pub fn find_date(name: &str) -> Option<&str> {
    DATE_RE.find(name).map(|m| m.as_str())
}

/// Validate a user-supplied date.
pub fn parse_date(value: &str) -> Result<String> {
    let value = value.trim();
    let shape_ok = DATE_RE
        .find(value)
        .is_some_and(|m| m.start() == 0 && m.end() == value.len());

    if !shape_ok || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err(PnxError::InvalidDate {
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Where add-date takes its date from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSource {
    /// The first date in each file's own name.
    FromFileName,
    /// One date for every file.
    Manual(String),
}

impl DateSource {
    pub fn manual(value: &str) -> Result<Self> {
        Ok(Self::Manual(parse_date(value)?))
    }
}

/// Append `date` as a new last field. Blank lines come back untouched.
pub fn append_date_to_line(line: &str, date: &str) -> String {
    let base = line.trim_end_matches('\n');
    if is_blank(base) {
        return base.to_string();
    }
    if base.ends_with(FIELD_SEPARATOR) {
        format!("{base}{date};")
    } else {
        format!("{base};{date};")
    }
}

/// Append `date` to every non-blank line of normalized content.
///
/// Returns the new content and the number of lines dated.
pub fn append_date_to_content(content: &str, date: &str) -> (String, usize) {
    let mut dated = 0;
    let lines: Vec<String> = content
        .split('\n')
        .map(|line| {
            if is_blank(line) {
                line.to_string()
            } else {
                dated += 1;
                append_date_to_line(line, date)
            }
        })
        .collect();
    (lines.join("\n"), dated)
}

/// Append a date to every record of each file, rewriting files in place.
pub fn append_date_to_files(files: &[PathBuf], source: &DateSource) -> Result<BatchReport> {
    if files.is_empty() {
        return Err(PnxError::MissingInput {
            what: "no files selected".to_string(),
        });
    }
    if let DateSource::Manual(date) = source {
        parse_date(date)?;
    }

    let mut report = BatchReport::default();

    for path in files {
        let label = file_label(path);
        let date = match source {
            DateSource::Manual(date) => date.clone(),
            DateSource::FromFileName => match find_date(&label) {
                Some(date) => date.to_string(),
                None => {
                    report.note(format!(
                        "{}: no YYYY-MM-DD date in file name, skipped",
                        label
                    ));
                    continue;
                }
            },
        };

        match date_file(path, &date) {
            Ok(Some(lines)) => {
                report.files_changed += 1;
                report.total_changes += lines;
                report.note(format!("{}: added date {} to {} lines", label, date, lines));
            }
            Ok(None) => log::debug!("{}: nothing to date", label),
            Err(e) => report.fail(path, e),
        }
    }

    Ok(report)
}

/// Returns the number of dated lines, or `None` when the file was left as is.
fn date_file(path: &Path, date: &str) -> Result<Option<usize>> {
    let content = normalize_text(&codec::read_text(path)?);
    let (updated, lines) = append_date_to_content(&content, date);

    if updated == content {
        return Ok(None);
    }
    codec::write_text(path, &updated)?;
    Ok(Some(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_date() {
        assert_eq!(find_date("2025-12-19_report.pnx"), Some("2025-12-19"));
        assert_eq!(find_date("cut 2024-01-02 and 2024-03-04"), Some("2024-01-02"));
        assert_eq!(find_date("report_final.pnx"), None);
        assert_eq!(find_date("2025-1-19"), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(" 2025-12-19 ").unwrap(), "2025-12-19");
        assert!(matches!(parse_date("2025-13-01"), Err(PnxError::InvalidDate { .. })));
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("19.12.2025").is_err());
        assert!(parse_date("2025-12-19x").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_append_date_to_line() {
        assert_eq!(append_date_to_line("a;b;", "2025-12-19"), "a;b;2025-12-19;");
        assert_eq!(append_date_to_line("a;b", "2025-12-19"), "a;b;2025-12-19;");
        assert_eq!(append_date_to_line("   ", "2025-12-19"), "   ");
        assert_eq!(append_date_to_line("", "2025-12-19"), "");
    }

    #[test]
    fn test_append_date_to_content_skips_blank_lines() {
        let (out, n) = append_date_to_content("a;1;\n\nb;2\n", "2025-01-02");
        assert_eq!(out, "a;1;2025-01-02;\n\nb;2;2025-01-02;\n");
        assert_eq!(n, 2);
    }

    #[test]
    fn test_append_date_from_file_name() {
        let tmp = TempDir::new().unwrap();
        let dated = tmp.path().join("2025-12-19_cut.pnx");
        let undated = tmp.path().join("cut.pnx");
        fs::write(&dated, "тимбер;1;\r\nпост;2\r\n").unwrap();
        fs::write(&undated, "тимбер;1;\n").unwrap();

        let report =
            append_date_to_files(&[dated.clone(), undated.clone()], &DateSource::FromFileName)
                .unwrap();

        assert_eq!(report.files_changed, 1);
        assert_eq!(report.total_changes, 2);
        assert!(report.log.iter().any(|l| l.contains("cut.pnx: no YYYY-MM-DD")));

        let text = codec::read_text(&dated).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["тимбер;1;2025-12-19;", "пост;2;2025-12-19;"]);
        assert_eq!(fs::read_to_string(&undated).unwrap(), "тимбер;1;\n");
    }

    #[test]
    fn test_append_manual_date_rejects_invalid_before_touching_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cut.pnx");
        fs::write(&path, "a;1;").unwrap();

        let source = DateSource::Manual("2025-19-19".to_string());
        assert!(append_date_to_files(&[path.clone()], &source).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "a;1;");
    }

    #[test]
    fn test_append_date_continues_after_failure() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.pnx");
        let present = tmp.path().join("present.pnx");
        fs::write(&present, "a;1;").unwrap();

        let source = DateSource::manual("2025-12-19").unwrap();
        let report = append_date_to_files(&[missing, present.clone()], &source).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.files_changed, 1);
        assert_eq!(codec::read_text(&present).unwrap(), "a;1;2025-12-19;");
    }

    #[test]
    fn test_append_date_requires_files() {
        assert!(matches!(
            append_date_to_files(&[], &DateSource::FromFileName),
            Err(PnxError::MissingInput { .. })
        ));
    }
}
