//! Concatenate the cutting lists of one folder into a single file.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::codec;
use crate::error::{PnxError, Result};
use crate::text::split_lines;

const OUTPUT_PREFIX: &str = "combined_";

/// Result of [`combine_files`]. `output` is `None` when nothing matched.
#[derive(Debug, Clone)]
pub struct CombineReport {
    pub sources: Vec<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Name of the combined file for a search string and extension.
pub fn combined_file_name(search: &str, ext: &str) -> String {
    format!("{}{}{}", OUTPUT_PREFIX, search.replace(' ', "_"), ext)
}

/// Files directly inside `folder` whose name contains `search` and ends with
/// `ext`, sorted by name. `exclude` is never listed.
pub fn find_sources(folder: &Path, search: &str, ext: &str, exclude: &str) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matched = {
            let name = entry.file_name().to_string_lossy();
            name.ends_with(ext) && name.contains(search) && name != exclude
        };
        if matched {
            sources.push(entry.into_path());
        }
    }

    Ok(sources)
}

/// Append one file's lines to `out`: trailing newlines dropped, then exactly
/// one `\n` after the last line.
fn append_source(out: &mut String, content: &str) {
    let trimmed = content.trim_end_matches(['\n', '\r']);
    out.push_str(&split_lines(trimmed).join("\n"));
    out.push('\n');
}

/// Combine matching files of `folder` into `combined_<search><ext>`.
pub fn combine_files(folder: &Path, search: &str, ext: &str) -> Result<CombineReport> {
    if folder.as_os_str().is_empty() || search.is_empty() || ext.is_empty() {
        return Err(PnxError::MissingInput {
            what: "folder, search text and extension are all required".to_string(),
        });
    }
    if !folder.is_dir() {
        return Err(PnxError::SourceNotFound {
            path: folder.to_path_buf(),
        });
    }

    let output_name = combined_file_name(search, ext);
    let sources = find_sources(folder, search, ext, &output_name)?;
    if sources.is_empty() {
        return Ok(CombineReport {
            sources,
            output: None,
        });
    }

    let mut combined = String::new();
    for source in &sources {
        log::debug!("Combining {}", source.display());
        append_source(&mut combined, &codec::read_text(source)?);
    }

    let output = folder.join(&output_name);
    codec::write_text(&output, &combined).map_err(|e| PnxError::WriteOutput {
        path: output.clone(),
        source: e,
    })?;
    log::info!("Combined {} files into {}", sources.len(), output.display());

    Ok(CombineReport {
        sources,
        output: Some(output),
    })
}
