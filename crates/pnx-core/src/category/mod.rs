//! # Category Module
//!
//! Classifies cutting-list records into categories by keyword rules.
//!
//! ## Rules
//!
//! A rule set is an ordered list of categories, each with an ordered list of
//! keywords. A keyword without spaces is a *token* rule and matches when the
//! record's first token starts with it; a keyword with a space is a *phrase*
//! rule and matches anywhere in the record's first field. The first category
//! with a matching keyword wins. Records nothing matches go to `other`.
//!
//! ## Modules
//!
//! - `builtin`: default categories
//! - `store`: persisted rules document and compiled rule set
//! - `classifier`: record classification
//!
//! ## Example
//!
//! ```rust
//! use pnx_core::category::{classify, RuleSet, OTHER_CATEGORY};
//!
//! let rules = RuleSet::builtin();
//! assert_eq!(classify("тимбер-люкс;5;", &rules), Some("тим"));
//! assert_eq!(classify("синкрон;10;20;", &rules), Some("без тим"));
//! assert_eq!(classify("неизвестно;1;", &rules), Some(OTHER_CATEGORY));
//! assert_eq!(classify("   ", &rules), None);
//! ```

mod builtin;
mod classifier;
mod store;

// Re-exports
pub use builtin::{BuiltinCategory, BUILTIN_CATEGORIES, OTHER_CATEGORY};
pub use classifier::{classify, classify_detailed, Classification};
pub use store::{
    parse_keyword_list, CategoryEntry, CategoryRule, Keyword, RuleSet, RulesDocument,
};
