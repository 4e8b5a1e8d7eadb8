//! Pattern-based batch renaming.
//!
//! Patterns are plain strings with placeholders:
//!
//! - `{index}` - 1-based position in the input list
//! - `{name}` - original file stem
//! - `{ext}` - original extension, without the dot
//! - `{date}` - local date as `YYYYMMDD`
//!
//! Files are processed independently; one failure never stops the rest.

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-file result of a [`batch_rename`] call.
#[derive(Debug, Clone)]
pub struct RenameOutcome {
    pub original: PathBuf,
    /// Destination path, `None` when the rename failed.
    pub renamed: Option<PathBuf>,
    pub error: Option<String>,
}

impl RenameOutcome {
    pub fn succeeded(&self) -> bool {
        self.renamed.is_some()
    }
}

/// Rename `files` according to `pattern`. With `output_dir` set, files move
/// there (the directory is created if missing); otherwise each file is
/// renamed next to its original. Returns one outcome per input, in order.
pub fn batch_rename(
    files: &[PathBuf],
    pattern: &str,
    output_dir: Option<&Path>,
) -> Vec<RenameOutcome> {
    let date = Local::now().format("%Y%m%d").to_string();

    if let Some(dir) = output_dir {
        if let Err(error) = fs::create_dir_all(dir) {
            tracing::warn!(dir = %dir.display(), %error, "cannot create output directory");
            return files
                .iter()
                .map(|file| RenameOutcome {
                    original: file.clone(),
                    renamed: None,
                    error: Some(error.to_string()),
                })
                .collect();
        }
    }

    files
        .iter()
        .enumerate()
        .map(|(i, file)| rename_one(file, i + 1, pattern, output_dir, &date))
        .collect()
}

fn rename_one(
    file: &Path,
    index: usize,
    pattern: &str,
    output_dir: Option<&Path>,
    date: &str,
) -> RenameOutcome {
    let failed = |error: String| RenameOutcome {
        original: file.to_path_buf(),
        renamed: None,
        error: Some(error),
    };

    if !file.exists() {
        return failed("file not found".to_string());
    }

    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = file
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();

    let new_name = pattern
        .replace("{index}", &index.to_string())
        .replace("{name}", &stem)
        .replace("{ext}", &ext)
        .replace("{date}", date);

    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => file.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let destination = dir.join(new_name);

    match fs::rename(file, &destination) {
        Ok(()) => {
            tracing::debug!(from = %file.display(), to = %destination.display(), "renamed");
            RenameOutcome {
                original: file.to_path_buf(),
                renamed: Some(destination),
                error: None,
            }
        }
        Err(error) => failed(error.to_string()),
    }
}
