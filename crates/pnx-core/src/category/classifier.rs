//! Record Classifier
//!
//! Assigns each non-blank record exactly one category of a [`RuleSet`].
//! Categories are tried in order and the first match wins; later categories
//! are never consulted. Records nothing matches land in [`OTHER_CATEGORY`].

use crate::text::{first_field, first_token, is_blank, normalize_key};

use super::builtin::OTHER_CATEGORY;
use super::store::{Keyword, RuleSet};

/// Outcome of classifying a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    /// A configured category matched through `keyword`.
    Matched {
        category: &'a str,
        keyword: &'a Keyword,
    },
    /// No rule matched.
    Other,
}

impl<'a> Classification<'a> {
    pub fn category(&self) -> &'a str {
        match *self {
            Self::Matched { category, .. } => category,
            Self::Other => OTHER_CATEGORY,
        }
    }

    pub fn keyword(&self) -> Option<&'a Keyword> {
        match *self {
            Self::Matched { keyword, .. } => Some(keyword),
            Self::Other => None,
        }
    }
}

/// Category name for `record`, or `None` for a blank record.
pub fn classify<'a>(record: &str, rules: &'a RuleSet) -> Option<&'a str> {
    classify_detailed(record, rules).map(|c| c.category())
}

/// Like [`classify`], also reporting which keyword matched.
pub fn classify_detailed<'a>(record: &str, rules: &'a RuleSet) -> Option<Classification<'a>> {
    if is_blank(record) {
        return None;
    }

    let field = normalize_key(first_field(record));
    let token = first_token(&field);

    for category in rules.categories() {
        if let Some(keyword) = category.keywords.iter().find(|k| k.matches(&field, token)) {
            return Some(Classification::Matched {
                category: &category.name,
                keyword,
            });
        }
    }

    Some(Classification::Other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::RulesDocument;

    fn rule_set(json: &str) -> RuleSet {
        RuleSet::from_document(&RulesDocument::from_json(json).unwrap())
    }

    #[test]
    fn test_builtin_examples() {
        let rules = RuleSet::builtin();
        assert_eq!(classify("синкрон;10;20;", &rules), Some("без тим"));
        assert_eq!(classify("тимбер-люкс;5;", &rules), Some("тим"));
        assert_eq!(classify("Evosoft;1;", &rules), Some("agt"));
        assert_eq!(classify("неизвестно;1;", &rules), Some(OTHER_CATEGORY));
    }

    #[test]
    fn test_blank_is_not_classified() {
        let rules = RuleSet::builtin();
        assert_eq!(classify("", &rules), None);
        assert_eq!(classify("   \t", &rules), None);
    }

    #[test]
    fn test_prefix_match() {
        let rules = rule_set(r#"{"тим": ["тим"]}"#);
        for record in ["тим;1;", "тимбер;1;", "тимберленд;1;", "ТИМБЕР 18;1;"] {
            assert_eq!(classify(record, &rules), Some("тим"), "{}", record);
        }
        assert_eq!(classify("безтим;1;", &rules), Some(OTHER_CATEGORY));
    }

    #[test]
    fn test_quoted_first_field_matches_token_rule() {
        let rules = RuleSet::builtin();
        assert_eq!(classify("\"тимбер-люкс\";5;", &rules), Some("тим"));
        assert_eq!(classify("(пост) белый;2;", &rules), Some("без тим"));

        let result = classify_detailed("«agt»;1;", &rules).unwrap();
        assert_eq!(result.category(), "agt");
        assert_eq!(result.keyword().map(Keyword::as_str), Some("agt"));
    }

    #[test]
    fn test_token_rule_ignores_later_words() {
        let rules = rule_set(r#"{"agt": ["agt"]}"#);
        assert_eq!(classify("panel agt;1;", &rules), Some(OTHER_CATEGORY));
    }

    #[test]
    fn test_phrase_match_anywhere_in_first_field() {
        let rules = rule_set(r#"{"agt": ["EvoSoft Panel"]}"#);
        assert_eq!(classify("белый evosoft panel 18;1;", &rules), Some("agt"));
        assert_eq!(classify("xevosoft panelx;1;", &rules), Some("agt"));
        assert_eq!(classify("evosoft;panel;", &rules), Some(OTHER_CATEGORY));
    }

    #[test]
    fn test_first_category_wins() {
        let rules = rule_set(r#"{"a": ["тимбер"], "b": ["тим"]}"#);
        assert_eq!(classify("тимбер;1;", &rules), Some("a"));

        let rules = rule_set(r#"{"b": ["тим"], "a": ["тимбер"]}"#);
        assert_eq!(classify("тимбер;1;", &rules), Some("b"));
    }

    #[test]
    fn test_only_first_field_matters() {
        let rules = RuleSet::builtin();
        assert_eq!(classify("деталь;тимбер;", &rules), Some(OTHER_CATEGORY));
    }

    #[test]
    fn test_invisible_marks_ignored() {
        let rules = RuleSet::builtin();
        assert_eq!(classify("\u{feff}  Пост;2;", &rules), Some("без тим"));
    }

    #[test]
    fn test_empty_category_matches_nothing() {
        let rules = rule_set(r#"{"empty": [], "agt": ["agt"]}"#);
        assert_eq!(classify("agt;1;", &rules), Some("agt"));
        assert_eq!(classify("x;1;", &rules), Some(OTHER_CATEGORY));
    }

    #[test]
    fn test_degenerate_rule_set() {
        let rules = rule_set("{}");
        assert_eq!(classify("тимбер;1;", &rules), Some(OTHER_CATEGORY));
    }

    #[test]
    fn test_detailed_reports_keyword() {
        let rules = RuleSet::builtin();
        let result = classify_detailed("лдсп белый;1;", &rules).unwrap();
        assert_eq!(result.category(), "тим");
        assert_eq!(result.keyword(), Some(&Keyword::Token("лдсп".into())));

        let result = classify_detailed("xyz", &rules).unwrap();
        assert_eq!(result, Classification::Other);
        assert_eq!(result.keyword(), None);
    }

    #[test]
    fn test_deterministic() {
        let rules = RuleSet::builtin();
        let first = classify("вуд;3;", &rules);
        for _ in 0..10 {
            assert_eq!(classify("вуд;3;", &rules), first);
        }
    }
}
