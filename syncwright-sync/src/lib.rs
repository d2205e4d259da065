//! # syncwright-sync
//!
//! Anchored patching of generated files and the runs built on it.
//!
//! Call [`export_exchanges`], [`sync_version`] or [`sync_errors`] to stage and
//! commit one run, or [`diff_all`] to preview every run without writing.

pub mod docs;
pub mod error;
pub mod hierarchy;
pub mod manifest;
pub mod patch;
pub mod pipeline;
pub mod registry;
pub mod version;
pub mod workset;

pub use error::SyncError;
pub use patch::{apply_patch, atomic_write, Anchor, ArtifactFile, WriteOutcome};
pub use pipeline::{
    diff_all, export_exchanges, sync_errors, sync_version, ErrorsReport, ExportReport,
    VersionReport,
};
pub use workset::{FileDiff, Workset};
