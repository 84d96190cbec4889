//! Split a cutting list into one file per category.
//!
//! Output files go next to the source as `<prefix> <category>.<ext>`. The
//! prefix keeps a `YYYY-MM-DD` date from the source name when there is one,
//! otherwise it is the sanitized source name.

use std::path::{Path, PathBuf};

use crate::category::{classify, RuleSet, OTHER_CATEGORY};
use crate::codec;
use crate::date::find_date;
use crate::error::{PnxError, Result};
use crate::text::{normalize_text, split_lines};

const MAX_PREFIX_CHARS: usize = 120;
const EMPTY_NAME: &str = "no_name";

/// Records assigned to one category, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputGroup<'a> {
    pub category: String,
    pub lines: Vec<&'a str>,
}

/// Records grouped by category: rule-set order, `other` last.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    groups: Vec<OutputGroup<'a>>,
}

impl<'a> Partition<'a> {
    pub fn groups(&self) -> &[OutputGroup<'a>] {
        &self.groups
    }

    /// Groups that would produce an output file.
    pub fn non_empty(&self) -> impl Iterator<Item = &OutputGroup<'a>> {
        self.groups.iter().filter(|g| !g.lines.is_empty())
    }

    pub fn lines(&self, category: &str) -> Option<&[&'a str]> {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.lines.as_slice())
    }

    /// Number of records placed in any group.
    pub fn total_lines(&self) -> usize {
        self.groups.iter().map(|g| g.lines.len()).sum()
    }
}

/// Group `lines` by category. Blank lines are dropped.
///
/// A configured category named `other` shares its group with the fallback.
pub fn partition<'a>(lines: &[&'a str], rules: &RuleSet) -> Partition<'a> {
    let mut groups: Vec<OutputGroup<'a>> = rules
        .names()
        .into_iter()
        .map(|name| OutputGroup {
            category: name.to_string(),
            lines: Vec::new(),
        })
        .collect();
    if !groups.iter().any(|g| g.category == OTHER_CATEGORY) {
        groups.push(OutputGroup {
            category: OTHER_CATEGORY.to_string(),
            lines: Vec::new(),
        });
    }

    for &line in lines {
        let Some(category) = classify(line, rules) else {
            continue;
        };
        if let Some(group) = groups.iter_mut().find(|g| g.category == category) {
            group.lines.push(line);
        }
    }

    Partition { groups }
}

/// Replace anything but letters (Latin, Cyrillic), digits, `-` and `_` with
/// `_`, and cap the length.
pub fn sanitize_name(name: &str) -> String {
    if name.is_empty() {
        return EMPTY_NAME.to_string();
    }
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric()
                || matches!(c, '-' | '_' | 'А'..='Я' | 'а'..='я' | 'Ё' | 'ё')
            {
                c
            } else {
                '_'
            }
        })
        .take(MAX_PREFIX_CHARS)
        .collect()
}

/// Prefix shared by all output names derived from `base_name` (the source
/// file name without extension).
pub fn output_prefix(base_name: &str) -> String {
    match find_date(base_name) {
        Some(date) => {
            let rest = base_name
                .split_once(date)
                .map(|(_, rest)| rest)
                .unwrap_or_default()
                .trim_start_matches(['_', ' ']);
            if rest.is_empty() {
                date.to_string()
            } else {
                format!("{date}_{rest}")
            }
        }
        None => sanitize_name(base_name),
    }
}

/// `<prefix> <category>.<ext>`, or without the dot when `ext` is `None`.
pub fn output_file_name(prefix: &str, category: &str, ext: Option<&str>) -> String {
    match ext {
        Some(ext) => format!("{prefix} {category}.{ext}"),
        None => format!("{prefix} {category}"),
    }
}

/// A file written by [`split_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedFile {
    pub category: String,
    pub path: PathBuf,
    pub lines: usize,
}

/// Result of a split run. An empty `created` list is not an error.
#[derive(Debug, Clone)]
pub struct SplitReport {
    pub source: PathBuf,
    pub created: Vec<CreatedFile>,
}

impl SplitReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }
}

/// Split `source` into category files in the same folder.
///
/// Stops at the first file that cannot be written. Files written before it
/// stay on disk.
pub fn split_file(source: &Path, rules: &RuleSet) -> Result<SplitReport> {
    if !source.is_file() {
        return Err(PnxError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }

    let content = normalize_text(&codec::read_text(source)?);
    let lines = split_lines(&content);
    let partition = partition(&lines, rules);
    log::debug!(
        "{}: {} lines, {} classified",
        source.display(),
        lines.len(),
        partition.total_lines()
    );

    let base_name = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = source.extension().map(|e| e.to_string_lossy().to_string());
    let folder = source.parent().unwrap_or_else(|| Path::new(""));
    let prefix = output_prefix(&base_name);

    let mut created = Vec::new();
    for group in partition.non_empty() {
        let name = output_file_name(&prefix, &group.category, ext.as_deref());
        let path = folder.join(&name);

        codec::write_text(&path, &group.lines.join("\n")).map_err(|e| PnxError::WriteOutput {
            path: path.clone(),
            source: e,
        })?;
        log::info!("Wrote {} ({} lines)", path.display(), group.lines.len());

        created.push(CreatedFile {
            category: group.category.clone(),
            path,
            lines: group.lines.len(),
        });
    }

    Ok(SplitReport {
        source: source.to_path_buf(),
        created,
    })
}
