pub mod category;
pub mod codec;
pub mod combine;
pub mod config;
pub mod date;
pub mod error;
pub mod paths;
pub mod replace;
pub mod report;
pub mod split;
pub mod text;

pub use combine::{combine_files, CombineReport};
pub use config::Config;
pub use date::{append_date_to_files, DateSource};
pub use error::{PnxError, Result};
pub use paths::AppPaths;
pub use replace::{apply_replacements_to_files, ReplaceRule, ReplaceRules};
pub use report::{BatchReport, FileFailure};
pub use split::{split_file, CreatedFile, SplitReport};

// Category system
pub use category::{
    classify, classify_detailed, Classification, Keyword, RuleSet, RulesDocument, OTHER_CATEGORY,
};
