//! Writing converted text to disk.
//!
//! Every output file goes through [`write_text_atomic`]: the payload is
//! written to a temporary sibling, synced, and renamed over the target. The
//! file handle lives in its own scope so it is closed before the rename, and
//! a drop guard removes the temporary file on any early return.

use std::{
    io,
    path::{Path, PathBuf},
};

use snafu::{Backtrace, prelude::*};
use tokio::{fs, io::AsyncWriteExt};

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while writing output files.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StorageError {
    /// Creating the parent directory failed.
    #[snafu(display("Failed to create directory {path}: {source}"))]
    CreateDir {
        /// Directory that could not be created.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
        /// Backtrace captured at the failure.
        backtrace: Backtrace,
    },

    /// Writing, syncing or renaming a file failed.
    #[snafu(display("Failed to write {path}: {source}"))]
    WriteFile {
        /// File being written.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
        /// Backtrace captured at the failure.
        backtrace: Backtrace,
    },
}

async fn create_parent_dir(abs: &Path) -> StorageResult<()> {
    if let Some(parent) = abs.parent() {
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(parent)
            .await
            .context(CreateDirSnafu {
                path: parent.display().to_string(),
            })?;
    }
    Ok(())
}

/// Removes a temporary file on drop unless disarmed.
struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    /// Call after the temporary file has been renamed into place.
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.armed {
            // Best-effort; the caller is already returning another error.
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Temporary path used while writing `target`: the full file name plus `.tmp`.
fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `contents` to `path`, replacing any existing file atomically.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns [`StorageError::CreateDir`] if the parent directory cannot be
/// created and [`StorageError::WriteFile`] for any failure while writing,
/// syncing or renaming. No temporary file is left behind on failure.
pub async fn write_text_atomic(path: &Path, contents: &str) -> StorageResult<()> {
    create_parent_dir(path).await?;

    let tmp_path = temp_path_for(path);
    let mut guard = TempFileGuard::new(tmp_path.clone());

    {
        let mut file = fs::File::create(&tmp_path)
            .await
            .context(WriteFileSnafu {
                path: tmp_path.display().to_string(),
            })?;

        file.write_all(contents.as_bytes())
            .await
            .context(WriteFileSnafu {
                path: tmp_path.display().to_string(),
            })?;

        file.sync_all()
            .await
            .context(WriteFileSnafu {
                path: tmp_path.display().to_string(),
            })?;
    }

    fs::rename(&tmp_path, path)
        .await
        .context(WriteFileSnafu {
            path: path.display().to_string(),
        })?;

    guard.disarm();
    log::debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
