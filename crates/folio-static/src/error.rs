//! Build errors.

use std::path::PathBuf;

use folio_markdown::ParseError;

/// Errors that abort a build.
///
/// Failed writes and copies are not represented here: they are logged and the
/// build carries on without them.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: ParseError },

    #[error("Failed to render template for {path}: {source}")]
    Template {
        path: PathBuf,
        source: minijinja::Error,
    },

    #[error("Unexpected source file location: {0}")]
    OutOfTree(PathBuf),

    #[error("Failed to walk source directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to clear output directory {path}: {source}")]
    Clear {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Build task failed: {0}")]
    Task(String),
}
