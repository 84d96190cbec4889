use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;

use pnx_core::category::{classify_detailed, parse_keyword_list, Keyword, RuleSet, RulesDocument};
use pnx_core::config::CONFIG_KEYS;
use pnx_core::{
    append_date_to_files, apply_replacements_to_files, combine_files, split_file, AppPaths,
    BatchReport, Config, DateSource, PnxError, ReplaceRules, Result,
};

mod args;
use args::{Cli, Commands, ConfigAction, ReplaceRulesAction, RulesAction, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let paths = AppPaths::new(resolve_base_dir(cli.base_dir));
    log::debug!("Settings directory: {}", paths.base_dir().display());

    let result = match cli.command {
        Some(Commands::Combine {
            folder,
            search,
            ext,
        }) => handle_combine(&paths, folder, search, ext),
        Some(Commands::Split { file }) => handle_split(&paths, &file),
        Some(Commands::Replace { files }) => handle_replace(&paths, &files),
        Some(Commands::AddDate { files, date }) => handle_add_date(&files, date.as_deref()),
        Some(Commands::Rules { action }) => handle_rules(action, &paths),
        Some(Commands::ReplaceRules { action }) => handle_replace_rules(action, &paths),
        Some(Commands::Config { action }) => handle_config(action, &paths),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "pnx-tool", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("PNX_TOOL_BASE") {
        return PathBuf::from(base);
    }

    dirs::data_dir()
        .map(|d| d.join("PNXTool"))
        .unwrap_or_else(|| PathBuf::from(".pnx-tool"))
}

fn handle_combine(
    paths: &AppPaths,
    folder: Option<PathBuf>,
    search: Option<String>,
    ext: Option<String>,
) -> Result<()> {
    let mut config = Config::load(paths)?;

    let folder = folder.unwrap_or_else(|| PathBuf::from(&config.combine.folder));
    let search = search.unwrap_or_else(|| config.combine.search.clone());
    let ext = ext.unwrap_or_else(|| config.combine.ext.clone());

    let report = combine_files(&folder, &search, &ext)?;

    config.remember_combine(&folder.to_string_lossy(), &search, &ext);
    config.save(paths)?;

    match report.output {
        Some(output) => {
            println!();
            for source in &report.sources {
                println!("  {}", source.display());
            }
            println!();
            println!(
                "{} Combined {} files into {}",
                "Done:".green(),
                report.sources.len(),
                output.display()
            );
        }
        None => {
            println!(
                "No files matching '{}' with extension '{}' in {}.",
                search,
                ext,
                folder.display()
            );
        }
    }

    Ok(())
}

fn handle_split(paths: &AppPaths, file: &Path) -> Result<()> {
    let rules = RuleSet::load(paths);
    let report = split_file(file, &rules)?;

    if report.is_empty() {
        println!("Nothing created - no lines matched any category.");
        return Ok(());
    }

    println!();
    println!("{} Created {} files:", "Done:".green(), report.created.len());
    for created in &report.created {
        let name = created
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        println!("  {} - {} lines", name.cyan(), created.lines);
    }

    Ok(())
}

fn handle_replace(paths: &AppPaths, files: &[PathBuf]) -> Result<()> {
    let rules = ReplaceRules::load(&paths.replace_rules_file())?;
    if rules.rules.is_empty() {
        println!("No replacement rules defined.");
        println!();
        println!("Add one with: pnx-tool replace-rules add <old> <new>");
        return Ok(());
    }

    let report = apply_replacements_to_files(&rules.rules, files)?;
    print_batch_log(&report);

    if report.total_changes == 0 {
        println!("No matches found, files were not changed.");
    } else {
        println!(
            "{} Replacements applied to {} files. Total replacements: {}",
            "Done:".green(),
            report.files_changed,
            report.total_changes
        );
    }

    Ok(())
}

fn handle_add_date(files: &[PathBuf], date: Option<&str>) -> Result<()> {
    let source = match date {
        Some(date) => DateSource::manual(date)?,
        None => DateSource::FromFileName,
    };

    let report = append_date_to_files(files, &source)?;
    print_batch_log(&report);

    if report.is_unchanged() {
        println!("No files changed (no date found in the file names?).");
    } else {
        println!(
            "{} Date added. Files changed: {}",
            "Done:".green(),
            report.files_changed
        );
    }

    Ok(())
}

fn print_batch_log(report: &BatchReport) {
    if report.log.is_empty() {
        return;
    }
    println!();
    for line in &report.log {
        if line.starts_with("Error") {
            println!("  {}", line.red());
        } else {
            println!("  {}", line);
        }
    }
    println!();
}

fn handle_rules(action: RulesAction, paths: &AppPaths) -> Result<()> {
    let rules_file = paths.rules_file();

    match action {
        RulesAction::List => {
            let doc = RulesDocument::load_or_builtin(&rules_file);
            println!();
            for entry in doc.entries() {
                println!("  {}: {}", entry.name.cyan().bold(), entry.keywords.join(", "));
            }
            println!("  {}: (everything else)", pnx_core::OTHER_CATEGORY.dimmed());
            println!();
        }
        RulesAction::Add { name } => {
            let mut doc = RulesDocument::load(&rules_file)?;
            doc.add_category(&name)?;
            doc.save(&rules_file)?;
            println!("{} {}", "Added:".green(), name.trim());
            println!();
            println!(
                "Set keywords with: pnx-tool rules set \"{}\" \"kw1, kw2\"",
                name.trim()
            );
        }
        RulesAction::Remove { name } => {
            let mut doc = RulesDocument::load(&rules_file)?;
            doc.remove_category(&name)?;
            doc.save(&rules_file)?;
            println!("{} {}", "Removed:".red(), name);
        }
        RulesAction::Set { name, keywords } => {
            let mut doc = RulesDocument::load(&rules_file)?;
            doc.set_keywords(&name, parse_keyword_list(&keywords))?;
            doc.save(&rules_file)?;
            let saved = doc
                .get(&name)
                .map(|e| e.keywords.join(", "))
                .unwrap_or_default();
            println!("{} {}: {}", "Set:".green(), name, saved);
        }
        RulesAction::Reset { force } => {
            if !force {
                print!("Replace all categories with the builtin defaults? Type 'yes' to confirm: ");
                io::stdout().flush()?;

                let mut input = String::new();
                io::stdin().read_line(&mut input)?;

                if input.trim() != "yes" {
                    println!("Aborted.");
                    return Ok(());
                }
            }
            RulesDocument::builtin().save(&rules_file)?;
            println!("{} builtin categories restored", "Reset:".green());
        }
        RulesAction::Classify { record } => {
            let rules = RuleSet::load(paths);
            match classify_detailed(&record, &rules) {
                Some(result) => {
                    let via = match result.keyword() {
                        Some(Keyword::Token(k)) => format!("token rule '{}'", k),
                        Some(Keyword::Phrase(k)) => format!("phrase rule '{}'", k),
                        None => "no rule matched".to_string(),
                    };
                    println!("{} ({})", result.category().cyan().bold(), via);
                }
                None => println!("Blank line - not classified."),
            }
        }
        RulesAction::Path => {
            println!("{}", rules_file.display());
        }
    }

    Ok(())
}

fn handle_replace_rules(action: ReplaceRulesAction, paths: &AppPaths) -> Result<()> {
    let rules_file = paths.replace_rules_file();

    match action {
        ReplaceRulesAction::List => {
            let rules = ReplaceRules::load(&rules_file)?;
            if rules.rules.is_empty() {
                println!("No replacement rules defined.");
                return Ok(());
            }
            println!();
            for (i, rule) in rules.rules.iter().enumerate() {
                println!("  {:>3}. '{}' -> '{}'", i + 1, rule.old.yellow(), rule.new.green());
            }
            println!();
        }
        ReplaceRulesAction::Add { old, new } => {
            let mut rules = ReplaceRules::load(&rules_file)?;
            rules.add(&old, &new)?;
            rules.save(&rules_file)?;
            println!("{} '{}' -> '{}'", "Added:".green(), old.trim(), new.trim());
        }
        ReplaceRulesAction::Remove { number } => {
            let mut rules = ReplaceRules::load(&rules_file)?;
            let index = number
                .checked_sub(1)
                .ok_or(PnxError::ReplaceRuleNotFound { index: number })?;
            let removed = rules
                .remove(index)
                .map_err(|_| PnxError::ReplaceRuleNotFound { index: number })?;
            rules.save(&rules_file)?;
            println!("{} '{}' -> '{}'", "Removed:".red(), removed.old, removed.new);
        }
        ReplaceRulesAction::Path => {
            println!("{}", rules_file.display());
        }
    }

    Ok(())
}

fn handle_config(action: ConfigAction, paths: &AppPaths) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(paths)?;
            let Some(value) = config.get(&key) else {
                eprintln!("Known keys: {}", CONFIG_KEYS.join(", "));
                return Err(PnxError::ConfigKeyNotFound { key });
            };
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(paths)?;
            config.set(&key, &value)?;
            config.save(paths)?;
            let stored = config.get(&key).unwrap_or_default();
            println!("{} {} = {}", "Set:".green(), key, show_value(&stored));
        }
        ConfigAction::List => {
            let config = Config::load(paths)?;
            println!();
            println!("{}", "[combine]".bold());
            for (key, value) in config.list() {
                let name = key.strip_prefix("combine.").unwrap_or(&key);
                println!("  {} = {}", name.cyan(), show_value(&value));
            }
            println!();
            println!(
                "{}",
                "Updated after every successful `pnx-tool combine`.".dimmed()
            );
        }
        ConfigAction::Path => {
            println!("{}", Config::path(paths).display());
        }
        ConfigAction::Init => {
            let path = Config::init(paths)?;
            println!("{} {}", "Config:".green(), path.display());
        }
    }

    Ok(())
}

fn show_value(value: &str) -> String {
    if value.is_empty() {
        "(not set)".dimmed().to_string()
    } else {
        format!("\"{}\"", value)
    }
}
