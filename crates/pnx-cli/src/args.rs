use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "pnx-tool")]
#[command(about = "Split, combine and edit PNX cutting lists")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Settings directory (default: <data dir>/PNXTool)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Combine matching files of a folder into one file
    Combine {
        /// Folder to scan (default: last used folder)
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// Text the file name must contain (default: last used, "cutlist_")
        #[arg(short, long)]
        search: Option<String>,

        /// File extension including the dot (default: last used, ".pnx")
        #[arg(short, long)]
        ext: Option<String>,
    },

    /// Split a file into one file per category
    Split {
        /// File to split
        file: PathBuf,
    },

    /// Apply the saved replacement rules to files
    Replace {
        /// Files to modify in place
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Append a date field to every record of each file
    AddDate {
        /// Files to modify in place
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Date to append (YYYY-MM-DD); default: the date in each file name
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Manage split categories
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Manage text replacement rules
    ReplaceRules {
        #[command(subcommand)]
        action: ReplaceRulesAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum RulesAction {
    /// List categories and their keywords
    List,

    /// Add an empty category (appended, lowest priority)
    Add {
        /// Category name
        name: String,
    },

    /// Remove a category
    Remove {
        /// Category name
        name: String,
    },

    /// Replace the keywords of a category
    Set {
        /// Category name
        name: String,

        /// Keywords, comma-separated (e.g. "тимбер, вуд, лдсп")
        keywords: String,
    },

    /// Restore the builtin categories
    Reset {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Show which category a record would go to
    Classify {
        /// Record line (e.g. "тимбер-люкс;5;")
        record: String,
    },

    /// Show rules file path
    Path,
}

#[derive(Subcommand)]
pub enum ReplaceRulesAction {
    /// List replacement rules
    List,

    /// Add a replacement rule
    Add {
        /// Text to search for
        old: String,

        /// Replacement text
        new: String,
    },

    /// Remove a replacement rule by its number in `list`
    Remove {
        /// Rule number (1-based)
        number: usize,
    },

    /// Show replacement rules file path
    Path,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., combine.search)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., combine.search)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}
