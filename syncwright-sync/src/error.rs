//! Error types for syncwright-sync.

use std::path::PathBuf;

use thiserror::Error;

use syncwright_core::CoreError;
use syncwright_renderer::RenderError;

/// All errors that can arise while staging or committing generated files.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An error loading canonical sources.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (id manifest).
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An anchor pattern failed to compile.
    #[error("invalid anchor pattern '{pattern}': {source}")]
    InvalidAnchor {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A mandatory anchor matched nothing.
    #[error("pattern not found in {path}: {anchor}")]
    PatternNotFound { path: PathBuf, anchor: String },

    /// A unique anchor matched more than once.
    #[error("anchor matched {matches} times in {path}, expected one: {anchor}")]
    AmbiguousAnchor {
        path: PathBuf,
        anchor: String,
        matches: usize,
    },

    /// A version string is not a dotted numeric triplet.
    #[error("'{0}' is not a MAJOR.MINOR.PATCH version")]
    InvalidVersion(String),

    /// A version template lacks the `{version}` placeholder.
    #[error("version template for {file} has no {{version}} placeholder: {template}")]
    InvalidTemplate { file: PathBuf, template: String },

    /// A config section required by the command is absent.
    #[error("syncwright.yaml has no '{0}' section")]
    MissingSection(&'static str),

    /// Some files in a batch failed; the others were written.
    #[error("{} of {total} files failed: {}", .failures.len(), .failures.join("; "))]
    Batch { total: usize, failures: Vec<String> },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
