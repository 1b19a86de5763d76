//! Asynchronous output writes and copies.

use std::path::{Path, PathBuf};

use tokio::runtime::Handle;
use walkdir::WalkDir;

use crate::tracker::WriteTracker;

/// Schedules writes and copies as tasks on a tokio runtime.
///
/// Each operation is registered with the tracker under its destination path
/// before it is spawned and settled when it finishes. Failures are logged and
/// still settle, so a failed write never blocks the tracker.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    tracker: WriteTracker,
    runtime: Handle,
}

impl OutputWriter {
    pub fn new(tracker: WriteTracker, runtime: Handle) -> Self {
        Self { tracker, runtime }
    }

    /// Writer bound to the runtime of the calling task.
    ///
    /// Panics outside a tokio runtime.
    pub fn current(tracker: WriteTracker) -> Self {
        Self::new(tracker, Handle::current())
    }

    pub fn tracker(&self) -> &WriteTracker {
        &self.tracker
    }

    /// Write `contents` to `file`, creating parent directories first.
    pub fn write(&self, file: PathBuf, contents: String) {
        self.tracker.begin(file.clone());
        let tracker = self.tracker.clone();

        self.runtime.spawn(async move {
            if let Some(parent) = file.parent() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    tracing::error!("can't create folder {}: {}", parent.display(), e);
                    tracker.end(&file);
                    return;
                }
            }

            if let Err(e) = tokio::fs::write(&file, contents).await {
                tracing::error!("can't write to {}: {}", file.display(), e);
            }
            tracker.end(&file);
        });
    }

    /// Copy `src` to `dst`. Directories are copied recursively.
    pub fn copy(&self, src: PathBuf, dst: PathBuf) {
        self.tracker.begin(dst.clone());
        let tracker = self.tracker.clone();

        self.runtime.spawn(async move {
            let result = {
                let (src, dst) = (src.clone(), dst.clone());
                tokio::task::spawn_blocking(move || copy_path(&src, &dst)).await
            };

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::error!("can't copy {} -> {}: {}", src.display(), dst.display(), e)
                }
                Err(e) => tracing::error!("copy task for {} failed: {}", dst.display(), e),
            }
            tracker.end(&dst);
        });
    }
}

/// Copy a file or a directory tree, creating missing parent directories.
pub fn copy_path(src: &Path, dst: &Path) -> std::io::Result<()> {
    if !src.is_dir() {
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(src, dst)?;
        return Ok(());
    }

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(std::io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(std::io::Error::other)?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

/// Remove everything inside `dir`, creating it when absent.
pub async fn empty_dir(dir: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_dir() {
            tokio::fs::remove_dir_all(&path).await?;
        } else {
            tokio::fs::remove_file(&path).await?;
        }
    }

    Ok(())
}
