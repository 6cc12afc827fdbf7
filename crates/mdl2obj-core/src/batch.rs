//! Batch discovery for converting every model under a directory.

use std::path::{Path, PathBuf};

use snafu::prelude::*;
use walkdir::WalkDir;

use crate::naming::sanitize_name;

/// Directory batch output goes to unless configured otherwise.
pub const DEFAULT_OUT_DIR: &str = "models/mdlConvert";

/// Errors raised while scanning for models.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BatchError {
    /// Walking the directory tree failed.
    #[snafu(display("Failed to scan {root} for models: {source}"))]
    Scan {
        /// Root being scanned.
        root: String,
        /// Underlying walk error.
        source: walkdir::Error,
    },
}

fn is_studio_model(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mdl"))
}

/// Every `.mdl` file in `root` (or below it when `recursive`), sorted.
///
/// The extension match is case-insensitive.
pub fn discover_models(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, BatchError> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut models = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(max_depth) {
        let entry = entry.context(ScanSnafu {
            root: root.display().to_string(),
        })?;
        if entry.file_type().is_file() && is_studio_model(entry.path()) {
            models.push(entry.into_path());
        }
    }

    models.sort();
    Ok(models)
}

/// Mesh path for `model` when converting everything under `root` into
/// `out_dir`.
///
/// The model's path relative to `root` is kept (so subdirectories survive),
/// its extension is dropped, and the result is passed through
/// [`sanitize_name`] before `.obj` is appended.
pub fn batch_output_path(root: &Path, out_dir: &Path, model: &Path) -> PathBuf {
    let relative = model.strip_prefix(root).unwrap_or(model);
    let without_ext = relative.with_extension("");
    let mut name = without_ext.to_string_lossy().replace('\\', "/");
    if let Some(stripped) = name.strip_prefix("./") {
        name = stripped.to_string();
    }
    out_dir.join(format!("{}.obj", sanitize_name(&name)))
}
