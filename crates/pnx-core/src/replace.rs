//! Literal text replacement across files.
//!
//! Rules are kept in `replace_rules.json` as an ordered list of
//! `{"old": ..., "new": ...}` pairs and applied in that order.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::{PnxError, Result};
use crate::report::{file_label, BatchReport};
use crate::text::normalize_text;

/// One literal replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceRule {
    #[serde(default)]
    pub old: String,
    #[serde(default)]
    pub new: String,
}

impl ReplaceRule {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }

    /// Trimmed copy, or `None` if there is nothing to search for.
    fn normalized(&self) -> Option<Self> {
        let old = self.old.trim();
        if old.is_empty() {
            return None;
        }
        Some(Self::new(old, self.new.trim()))
    }
}

/// Persisted replacement rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplaceRules {
    pub rules: Vec<ReplaceRule>,
}

impl ReplaceRules {
    /// Load rules. A missing file means no rules.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| PnxError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn add(&mut self, old: &str, new: &str) -> Result<()> {
        let old = old.trim();
        if old.is_empty() {
            return Err(PnxError::EmptyReplaceRule);
        }
        self.rules.push(ReplaceRule::new(old, new.trim()));
        Ok(())
    }

    /// Remove by zero-based position.
    pub fn remove(&mut self, index: usize) -> Result<ReplaceRule> {
        if index >= self.rules.len() {
            return Err(PnxError::ReplaceRuleNotFound { index });
        }
        Ok(self.rules.remove(index))
    }
}

/// Replacement count of one rule in one piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    pub rule: ReplaceRule,
    pub count: usize,
}

/// Apply `rules` in order to normalized `content`.
///
/// Later rules see the output of earlier ones.
pub fn apply_replacements(content: &str, rules: &[ReplaceRule]) -> (String, Vec<RuleHit>) {
    let mut text = content.to_string();
    let mut hits = Vec::new();

    for rule in rules.iter().filter_map(ReplaceRule::normalized) {
        let count = text.matches(rule.old.as_str()).count();
        if count > 0 {
            text = text.replace(rule.old.as_str(), &rule.new);
            hits.push(RuleHit { rule, count });
        }
    }

    (text, hits)
}

/// Apply `rules` to each file in place. Files only change on disk when a
/// rule matched.
pub fn apply_replacements_to_files(rules: &[ReplaceRule], files: &[PathBuf]) -> Result<BatchReport> {
    if files.is_empty() {
        return Err(PnxError::MissingInput {
            what: "no files selected".to_string(),
        });
    }

    let mut report = BatchReport::default();

    for path in files {
        let label = file_label(path);
        match replace_in_file(path, rules) {
            Ok(hits) => {
                if hits.is_empty() {
                    continue;
                }
                for hit in &hits {
                    report.note(format!(
                        "{}: '{}' -> '{}' ({} replacements)",
                        label, hit.rule.old, hit.rule.new, hit.count
                    ));
                    report.total_changes += hit.count;
                }
                report.files_changed += 1;
            }
            Err(e) => report.fail(path, e),
        }
    }

    Ok(report)
}

fn replace_in_file(path: &Path, rules: &[ReplaceRule]) -> Result<Vec<RuleHit>> {
    let content = normalize_text(&codec::read_text(path)?);
    let (updated, hits) = apply_replacements(&content, rules);

    if updated != content {
        codec::write_text(path, &updated)?;
    }
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_apply_replacements_counts() {
        let rules = vec![
            ReplaceRule::new(" ЛДСП ", "ДСП"),
            ReplaceRule::new("  ", "ignored"),
            ReplaceRule::new("aa", "b"),
        ];
        let (out, hits) = apply_replacements("ЛДСП;aaa;ЛДСП;", &rules);

        assert_eq!(out, "ДСП;ba;ДСП;");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].count, 2);
        assert_eq!(hits[0].rule.old, "ЛДСП");
        assert_eq!(hits[1].count, 1);
    }

    #[test]
    fn test_apply_replacements_chain() {
        let rules = vec![ReplaceRule::new("a", "b"), ReplaceRule::new("b", "c")];
        let (out, hits) = apply_replacements("ab", &rules);
        assert_eq!(out, "cc");
        assert_eq!(hits[1].count, 2);
    }

    #[test]
    fn test_rules_load_missing_and_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("replace_rules.json");
        assert!(ReplaceRules::load(&path).unwrap().rules.is_empty());

        let mut rules = ReplaceRules::default();
        rules.add(" вуд ", " тимбер ").unwrap();
        rules.add("x", "").unwrap();
        assert!(matches!(rules.add("  ", "y"), Err(PnxError::EmptyReplaceRule)));
        rules.save(&path).unwrap();

        let loaded = ReplaceRules::load(&path).unwrap();
        assert_eq!(loaded, rules);
        assert_eq!(loaded.rules[0], ReplaceRule::new("вуд", "тимбер"));
    }

    #[test]
    fn test_rules_load_legacy_format() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("replace_rules.json");
        fs::write(&path, r#"[{"old": "a", "new": "b"}, {"old": "c"}]"#).unwrap();

        let rules = ReplaceRules::load(&path).unwrap();
        assert_eq!(rules.rules[1], ReplaceRule::new("c", ""));

        fs::write(&path, "{}").unwrap();
        assert!(matches!(
            ReplaceRules::load(&path),
            Err(PnxError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_rules_remove() {
        let mut rules = ReplaceRules::default();
        rules.add("a", "b").unwrap();
        assert!(matches!(
            rules.remove(3),
            Err(PnxError::ReplaceRuleNotFound { index: 3 })
        ));
        assert_eq!(rules.remove(0).unwrap().old, "a");
        assert!(rules.rules.is_empty());
    }

    #[test]
    fn test_apply_to_files() {
        let tmp = TempDir::new().unwrap();
        let hit = tmp.path().join("hit.pnx");
        let miss = tmp.path().join("miss.pnx");
        let gone = tmp.path().join("gone.pnx");
        fs::write(&hit, "вуд;1;\r\nвуд;2;").unwrap();
        fs::write(&miss, "пост;1;\r\n").unwrap();

        let rules = vec![ReplaceRule::new("вуд", "тимбер")];
        let report =
            apply_replacements_to_files(&rules, &[hit.clone(), miss.clone(), gone]).unwrap();

        assert_eq!(report.files_changed, 1);
        assert_eq!(report.total_changes, 2);
        assert_eq!(report.failures.len(), 1);
        assert!(report.log[0].contains("'вуд' -> 'тимбер' (2 replacements)"));

        let text = codec::read_text(&hit).unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["тимбер;1;", "тимбер;2;"]);
        assert_eq!(fs::read_to_string(&miss).unwrap(), "пост;1;\r\n");
    }

    #[test]
    fn test_apply_to_files_requires_files() {
        assert!(matches!(
            apply_replacements_to_files(&[], &[]),
            Err(PnxError::MissingInput { .. })
        ));
    }
}
