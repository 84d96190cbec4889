use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PnxError {
    #[error("Category already exists: {name}")]
    CategoryAlreadyExists { name: String },

    #[error("Category not found: {name}")]
    CategoryNotFound { name: String },

    #[error("Invalid category name: '{name}' - must not be empty")]
    InvalidCategoryName { name: String },

    #[error("Replacement rule not found: #{index}")]
    ReplaceRuleNotFound { index: usize },

    #[error("Replacement rule must have a non-empty search text")]
    EmptyReplaceRule,

    #[error("Invalid date: '{value}' - expected YYYY-MM-DD (e.g. 2025-12-19)")]
    InvalidDate { value: String },

    #[error("Missing input: {what}")]
    MissingInput { what: String },

    #[error("Source file does not exist: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Failed to write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Config key not found: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, PnxError>;

impl PnxError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CategoryNotFound { .. } | Self::ReplaceRuleNotFound { .. } => 2,
            Self::SourceNotFound { .. } => 3,
            Self::WriteOutput { .. } => 4,
            Self::InvalidCategoryName { .. }
            | Self::InvalidDate { .. }
            | Self::EmptyReplaceRule
            | Self::MissingInput { .. } => 5,
            Self::CategoryAlreadyExists { .. } => 6,
            _ => 1,
        }
    }
}
