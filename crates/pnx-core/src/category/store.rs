//! Rule Store
//!
//! Two views of the category rules:
//!
//! - [`RulesDocument`]: the editable form persisted in `rules.json`, a JSON
//!   object mapping category name to a keyword list (or a single keyword).
//! - [`RuleSet`]: the compiled, read-only form the classifier uses, with
//!   keywords normalized and tagged as tokens or phrases.
//!
//! Key order in the JSON object is the category priority.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{PnxError, Result};
use crate::paths::AppPaths;
use crate::text::normalize_key;

use super::builtin::BUILTIN_CATEGORIES;

// ============================================================================
// RulesDocument
// ============================================================================

/// One category as it appears in the rules file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Editable category rules, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesDocument {
    entries: Vec<CategoryEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeywordList {
    One(String),
    Many(Vec<String>),
}

impl RulesDocument {
    pub fn builtin() -> Self {
        let entries = BUILTIN_CATEGORIES
            .iter()
            .map(|b| CategoryEntry {
                name: b.name.to_string(),
                keywords: b.keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect();
        Self { entries }
    }

    /// Parse the JSON form. A bare string value counts as one keyword.
    pub fn from_json(content: &str) -> Result<Self> {
        let map: Map<String, Value> = serde_json::from_str(content)?;
        let mut entries = Vec::with_capacity(map.len());

        for (name, value) in map {
            let keywords = match serde_json::from_value::<KeywordList>(value)? {
                KeywordList::One(keyword) => vec![keyword],
                KeywordList::Many(keywords) => keywords,
            };
            entries.push(CategoryEntry { name, keywords });
        }

        Ok(Self { entries })
    }

    pub fn to_json(&self) -> Result<String> {
        let mut map = Map::new();
        for entry in &self.entries {
            let keywords = entry
                .keywords
                .iter()
                .map(|k| Value::String(k.clone()))
                .collect();
            map.insert(entry.name.clone(), Value::Array(keywords));
        }
        Ok(serde_json::to_string_pretty(&Value::Object(map))?)
    }

    /// Load from a file. A missing file yields the builtin rules.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::builtin());
        }
        let content = fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| PnxError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from a file, falling back to the builtin rules on any error.
    pub fn load_or_builtin(path: &Path) -> Self {
        match Self::load(path) {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("Using builtin rules, could not read rules file: {}", e);
                Self::builtin()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&CategoryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Append a new category with no keywords.
    pub fn add_category(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PnxError::InvalidCategoryName {
                name: name.to_string(),
            });
        }
        if self.get(name).is_some() {
            return Err(PnxError::CategoryAlreadyExists {
                name: name.to_string(),
            });
        }
        self.entries.push(CategoryEntry {
            name: name.to_string(),
            keywords: Vec::new(),
        });
        Ok(())
    }

    pub fn remove_category(&mut self, name: &str) -> Result<CategoryEntry> {
        let index = self.position(name)?;
        Ok(self.entries.remove(index))
    }

    /// Replace the keywords of an existing category.
    pub fn set_keywords(&mut self, name: &str, keywords: Vec<String>) -> Result<()> {
        let index = self.position(name)?;
        self.entries[index].keywords = keywords
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Ok(())
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| PnxError::CategoryNotFound {
                name: name.to_string(),
            })
    }
}

impl Default for RulesDocument {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Parse a keyword list typed by a user: `a, b, c` or `["a", "b"]`.
pub fn parse_keyword_list(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    let inner = if trimmed.starts_with('[') && trimmed.ends_with(']') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    inner
        .split(',')
        .map(|s| s.trim().trim_matches('"').trim_matches('\'').trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// ============================================================================
// RuleSet
// ============================================================================

/// A normalized keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyword {
    /// Single word, compared against the record's first token.
    Token(String),
    /// Contains an internal space, searched for in the whole first field.
    Phrase(String),
}

impl Keyword {
    /// Normalize a raw keyword. Returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = normalize_key(raw);
        if key.is_empty() {
            None
        } else if key.contains(' ') {
            Some(Self::Phrase(key))
        } else {
            Some(Self::Token(key))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Token(s) | Self::Phrase(s) => s,
        }
    }

    /// Match against a normalized first field and its token.
    pub fn matches(&self, field: &str, token: &str) -> bool {
        match self {
            Self::Phrase(phrase) => field.contains(phrase.as_str()),
            Self::Token(keyword) => token.starts_with(keyword.as_str()),
        }
    }
}

/// A category and its keywords, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<Keyword>,
}

/// Compiled rules. Never mutated during classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    categories: Vec<CategoryRule>,
}

impl RuleSet {
    pub fn builtin() -> Self {
        Self::from_document(&RulesDocument::builtin())
    }

    /// Rules stored under `paths`, or the builtin set when the file is
    /// missing or malformed.
    pub fn load(paths: &AppPaths) -> Self {
        Self::from_document(&RulesDocument::load_or_builtin(&paths.rules_file()))
    }

    pub fn from_document(doc: &RulesDocument) -> Self {
        let categories = doc
            .entries()
            .iter()
            .map(|entry| CategoryRule {
                name: entry.name.clone(),
                keywords: entry.keywords.iter().filter_map(|k| Keyword::parse(k)).collect(),
            })
            .collect();
        Self { categories }
    }

    pub fn categories(&self) -> &[CategoryRule] {
        &self.categories
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&CategoryRule> {
        self.categories.iter().find(|c| c.name == name)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_document_keeps_key_order() {
        let doc = RulesDocument::from_json(r#"{"z": ["a"], "a": ["b"], "m": ["c"]}"#).unwrap();
        let names: Vec<_> = doc.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_document_accepts_single_string() {
        let doc = RulesDocument::from_json(r#"{"agt": "evosoft"}"#).unwrap();
        assert_eq!(doc.get("agt").unwrap().keywords, vec!["evosoft"]);
    }

    #[test]
    fn test_document_rejects_non_object() {
        assert!(RulesDocument::from_json("[1, 2]").is_err());
        assert!(RulesDocument::from_json(r#"{"a": 5}"#).is_err());
        assert!(RulesDocument::from_json("not json").is_err());
    }

    #[test]
    fn test_document_json_roundtrip_order() {
        let doc = RulesDocument::builtin();
        let json = doc.to_json().unwrap();
        assert!(json.find("тим").unwrap() < json.find("agt").unwrap());
        assert_eq!(RulesDocument::from_json(&json).unwrap(), doc);
    }

    #[test]
    fn test_document_load_missing_is_builtin() {
        let tmp = TempDir::new().unwrap();
        let doc = RulesDocument::load(&tmp.path().join("rules.json")).unwrap();
        assert_eq!(doc, RulesDocument::builtin());
    }

    #[test]
    fn test_document_load_malformed_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("rules.json");
        fs::write(&path, "{ broken").unwrap();
        assert!(matches!(
            RulesDocument::load(&path),
            Err(PnxError::ConfigParse { .. })
        ));
        assert_eq!(RulesDocument::load_or_builtin(&path), RulesDocument::builtin());
    }

    #[test]
    fn test_document_edit_operations() {
        let mut doc = RulesDocument::builtin();

        doc.add_category("кромка").unwrap();
        assert!(matches!(
            doc.add_category("кромка"),
            Err(PnxError::CategoryAlreadyExists { .. })
        ));
        assert!(matches!(
            doc.add_category("  "),
            Err(PnxError::InvalidCategoryName { .. })
        ));

        doc.set_keywords("кромка", vec![" пвх ".into(), "".into(), "abs".into()])
            .unwrap();
        assert_eq!(doc.get("кромка").unwrap().keywords, vec!["пвх", "abs"]);

        let removed = doc.remove_category("agt").unwrap();
        assert_eq!(removed.name, "agt");
        assert!(matches!(
            doc.remove_category("agt"),
            Err(PnxError::CategoryNotFound { .. })
        ));

        let names: Vec<_> = doc.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["тим", "без тим", "кромка"]);
    }

    #[test]
    fn test_document_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("PNXTool").join("rules.json");

        let mut doc = RulesDocument::builtin();
        doc.add_category("кромка").unwrap();
        doc.save(&path).unwrap();

        assert_eq!(RulesDocument::load(&path).unwrap(), doc);
    }

    #[test]
    fn test_parse_keyword_list() {
        assert_eq!(parse_keyword_list("тимбер, вуд ,,лдсп"), vec!["тимбер", "вуд", "лдсп"]);
        assert_eq!(parse_keyword_list(r#"["a", "b c"]"#), vec!["a", "b c"]);
        assert!(parse_keyword_list("[]").is_empty());
    }

    #[test]
    fn test_keyword_parse() {
        assert_eq!(Keyword::parse("  Тимбер "), Some(Keyword::Token("тимбер".into())));
        assert_eq!(
            Keyword::parse("EvoSoft Panel"),
            Some(Keyword::Phrase("evosoft panel".into()))
        );
        assert_eq!(Keyword::parse(" \u{feff} "), None);
    }

    #[test]
    fn test_rule_set_drops_empty_keywords() {
        let doc = RulesDocument::from_json(r#"{"a": ["", "  ", "X"], "b": []}"#).unwrap();
        let rules = RuleSet::from_document(&doc);
        assert_eq!(rules.get("a").unwrap().keywords, vec![Keyword::Token("x".into())]);
        assert!(rules.get("b").unwrap().keywords.is_empty());
        assert_eq!(rules.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_rule_set_load_falls_back() {
        let tmp = TempDir::new().unwrap();
        let paths = AppPaths::new(tmp.path());
        assert_eq!(RuleSet::load(&paths), RuleSet::builtin());

        fs::write(paths.rules_file(), "[\"not\", \"a map\"]").unwrap();
        assert_eq!(RuleSet::load(&paths), RuleSet::builtin());

        fs::write(paths.rules_file(), r#"{"only": ["one"]}"#).unwrap();
        assert_eq!(RuleSet::load(&paths).names(), vec!["only"]);
    }
}
