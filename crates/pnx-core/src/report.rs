use std::path::{Path, PathBuf};

/// A file a batch operation could not process.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of an operation applied to several files.
///
/// A failure on one file is recorded here and the batch moves on.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Human-readable log lines, in processing order.
    pub log: Vec<String>,
    /// Files rewritten on disk.
    pub files_changed: usize,
    /// Replacements made or lines dated, across all files.
    pub total_changes: usize,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn note(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::info!("{}", line);
        self.log.push(line);
    }

    pub fn fail(&mut self, path: &Path, error: impl std::fmt::Display) {
        let message = error.to_string();
        let line = format!("Error processing {}: {}", file_label(path), message);
        log::warn!("{}", line);
        self.log.push(line);
        self.failures.push(FileFailure {
            path: path.to_path_buf(),
            message,
        });
    }

    pub fn is_unchanged(&self) -> bool {
        self.files_changed == 0
    }
}

/// File name for log lines, falling back to the full path.
pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
