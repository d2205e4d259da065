//! Error types for syncwright-renderer.

use std::path::PathBuf;

use thiserror::Error;

use syncwright_core::TargetSyntax;

/// All errors that can arise from rendering generated blocks and tables.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// JSON serialization error (building tera context).
    #[error("context serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error while loading template overrides.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    /// An override file that replaces no embedded block template.
    #[error("template override {0} does not name a known <syntax>/<block>.tera template")]
    UnknownOverride(PathBuf),

    /// The syntax has no template for the requested block.
    #[error("{syntax} files have no '{block}' block")]
    UnsupportedBlock {
        syntax: TargetSyntax,
        block: &'static str,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}
