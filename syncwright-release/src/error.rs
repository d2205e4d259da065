use std::path::PathBuf;

use thiserror::Error;

/// Error surface for tag curation and changelog generation.
#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed tag `{tag}`: {reason}")]
    MalformedTag { tag: String, reason: &'static str },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {args} failed (status {status}): {stderr}")]
    Git {
        args: String,
        status: String,
        stderr: String,
    },

    #[error("sync error: {0}")]
    Sync(#[from] syncwright_sync::SyncError),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ReleaseError {
    ReleaseError::Io {
        path: path.into(),
        source,
    }
}
