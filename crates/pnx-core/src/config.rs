use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{PnxError, Result};
use crate::paths::AppPaths;

const DEFAULT_SEARCH: &str = "cutlist_";
const DEFAULT_EXT: &str = ".pnx";

/// Keys accepted by [`Config::get`] and [`Config::set`], in file order.
pub const CONFIG_KEYS: &[&str] = &["combine.folder", "combine.search", "combine.ext"];

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# pnx-tool configuration file
# Location: <data dir>/PNXTool/config.toml

[combine]
# Folder scanned by `pnx-tool combine` when --folder is not given
# Default: "" (must be given on the command line)
folder = ""

# Only files whose name contains this text are combined
# Default: "cutlist_"
search = "cutlist_"

# Only files with this extension are combined
# Default: ".pnx"
ext = ".pnx"
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub combine: CombineConfig,
}

/// Last values used by combine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CombineConfig {
    #[serde(default)]
    pub folder: String,

    #[serde(default = "default_search")]
    pub search: String,

    #[serde(default = "default_ext")]
    pub ext: String,
}

fn default_search() -> String {
    DEFAULT_SEARCH.to_string()
}

fn default_ext() -> String {
    DEFAULT_EXT.to_string()
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            folder: String::new(),
            search: default_search(),
            ext: default_ext(),
        }
    }
}

impl Config {
    /// Load config. A missing file yields the defaults.
    pub fn load(paths: &AppPaths) -> Result<Self> {
        let path = paths.config_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| PnxError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    pub fn save(&self, paths: &AppPaths) -> Result<()> {
        paths.ensure_base_dir()?;
        let content = toml::to_string_pretty(self)?;
        fs::write(paths.config_file(), content)?;
        Ok(())
    }

    pub fn path(paths: &AppPaths) -> PathBuf {
        paths.config_file()
    }

    /// Initialize config with default template (rich comments)
    pub fn init(paths: &AppPaths) -> Result<PathBuf> {
        let path = paths.config_file();
        paths.ensure_base_dir()?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Remember the values of a combine run.
    pub fn remember_combine(&mut self, folder: &str, search: &str, ext: &str) {
        self.combine = CombineConfig {
            folder: folder.to_string(),
            search: search.to_string(),
            ext: ext.to_string(),
        };
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "combine.folder" => Some(self.combine.folder.clone()),
            "combine.search" => Some(self.combine.search.clone()),
            "combine.ext" => Some(self.combine.ext.clone()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let slot = match key {
            "combine.folder" => &mut self.combine.folder,
            "combine.search" => &mut self.combine.search,
            "combine.ext" => &mut self.combine.ext,
            _ => {
                return Err(PnxError::ConfigKeyNotFound {
                    key: key.to_string(),
                })
            }
        };
        *slot = value.trim().to_string();
        Ok(())
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }
}
