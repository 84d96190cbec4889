use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

const RULES_FILE: &str = "rules.json";
const REPLACE_RULES_FILE: &str = "replace_rules.json";
const CONFIG_FILE: &str = "config.toml";

/// Locations of the persisted settings.
///
/// Everything that touches settings takes an `AppPaths` explicitly, so tests
/// can point it at a temporary directory.
#[derive(Debug, Clone)]
pub struct AppPaths {
    base_dir: PathBuf,
}

impl AppPaths {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Category rules used by split.
    pub fn rules_file(&self) -> PathBuf {
        self.base_dir.join(RULES_FILE)
    }

    /// Text replacement rules.
    pub fn replace_rules_file(&self) -> PathBuf {
        self.base_dir.join(REPLACE_RULES_FILE)
    }

    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    pub fn ensure_base_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }
}
