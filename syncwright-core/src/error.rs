//! Error types for syncwright-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading canonical sources or building the
/// catalog.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON parse error while reading the authoritative version field.
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `syncwright.yaml` did not exist at the expected path.
    #[error("config not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// The version document lacks the configured string field.
    #[error("{path} has no string field '{field}'")]
    MissingVersionField { path: PathBuf, field: String },

    /// The canonical error hierarchy violates a structural rule.
    #[error("invalid error hierarchy: {0}")]
    InvalidHierarchy(String),

    /// A descriptor's field-name set matched no known layout.
    #[error("descriptor {path} has an unrecognised shape (fields: {fields})")]
    UnknownDescriptorShape { path: PathBuf, fields: String },

    /// A catalog record could not be instantiated.
    #[error("failed to instantiate '{id}': {reason}")]
    Instantiate { id: String, reason: String },

    /// A descriptor declares a dependency that is not present.
    #[error("'{id}' requires '{dependency}', which is not available")]
    MissingDependency { id: String, dependency: String },
}

/// Convenience constructor for [`CoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
