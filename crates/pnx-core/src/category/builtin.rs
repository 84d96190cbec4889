//! Builtin Rule Set
//!
//! Used whenever no rules file exists or the file cannot be parsed.

/// Fallback category for records no rule matches.
pub const OTHER_CATEGORY: &str = "other";

/// Default categories, in priority order.
pub const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    BuiltinCategory {
        name: "тим",
        keywords: &["тимбер", "вуд", "лдсп"],
    },
    BuiltinCategory {
        name: "без тим",
        keywords: &["синкрон", "пост"],
    },
    BuiltinCategory {
        name: "agt",
        keywords: &["evosoft", "evogloss", "agt"],
    },
];

/// Static category definition.
#[derive(Debug, Clone)]
pub struct BuiltinCategory {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}
