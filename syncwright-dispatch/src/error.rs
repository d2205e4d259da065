use std::path::PathBuf;

use thiserror::Error;

/// Error surface for translation workers and output writing.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sync error: {0}")]
    Sync(#[from] syncwright_sync::SyncError),

    #[error("translator `{program}` failed (status {status}): {stderr}")]
    TranslatorFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("translator returned {actual} outputs for {expected} targets")]
    OutputCount { expected: usize, actual: usize },

    #[error("translator output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("worker pool closed")]
    PoolClosed,

    #[error("{task} task join failure: {message}")]
    Join { task: &'static str, message: String },

    #[error("no translation targets requested")]
    NoTargets,

    #[error("syncwright.yaml has no '{0}' section")]
    MissingSection(&'static str),

    #[error("no translation target configured for language `{0}`")]
    UnknownTarget(String),

    #[error("source unit has no file stem: {0}")]
    NoStem(PathBuf),

    #[error("{first} and {second} would both be written to {path}")]
    OutputCollision {
        path: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DispatchError {
    DispatchError::Io {
        path: path.into(),
        source,
    }
}

pub(crate) fn join_err(task: &'static str, err: tokio::task::JoinError) -> DispatchError {
    DispatchError::Join {
        task,
        message: err.to_string(),
    }
}
