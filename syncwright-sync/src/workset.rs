//! Staged edits across many files.
//!
//! Every stage of a run patches files inside one [`Workset`]. Edits to the
//! same file are applied in stage order; nothing reaches disk until
//! [`Workset::commit`], which writes each file once, sequentially.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use crate::error::SyncError;
use crate::patch::{ArtifactFile, WriteOutcome};

/// A single staged file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

#[derive(Debug, Default)]
pub struct Workset {
    files: BTreeMap<PathBuf, ArtifactFile>,
}

impl Workset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_staged(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Edit the existing file at `path`. If `edit` fails the file keeps the
    /// content it had before the call.
    pub fn edit<F>(&mut self, path: &Path, edit: F) -> Result<(), SyncError>
    where
        F: FnOnce(&mut ArtifactFile) -> Result<(), SyncError>,
    {
        let mut file = match self.files.get(path) {
            Some(staged) => staged.clone(),
            None => ArtifactFile::open(path)?,
        };
        edit(&mut file)?;
        self.files.insert(path.to_path_buf(), file);
        Ok(())
    }

    /// Stage the whole content of `path`, creating it on commit if needed.
    pub fn write(&mut self, path: &Path, content: &str) -> Result<(), SyncError> {
        let mut file = match self.files.remove(path) {
            Some(staged) => staged,
            None => ArtifactFile::open_or_new(path)?,
        };
        file.set_content(content);
        self.files.insert(path.to_path_buf(), file);
        Ok(())
    }

    pub fn files(&self) -> impl Iterator<Item = &ArtifactFile> {
        self.files.values()
    }

    /// Commit every staged file in path order.
    pub fn commit(&self, dry_run: bool) -> Result<Vec<WriteOutcome>, SyncError> {
        let mut writes = Vec::with_capacity(self.files.len());
        for file in self.files.values() {
            writes.push(file.commit(dry_run)?);
        }
        Ok(writes)
    }

    /// Unified diffs of every modified file, headers relative to `root`.
    pub fn diffs(&self, root: &Path) -> Vec<FileDiff> {
        let mut diffs = Vec::new();
        for file in self.files.values() {
            if !file.is_modified() {
                continue;
            }
            let relative = file.path().strip_prefix(root).unwrap_or(file.path());
            let old_header = format!("a/{}", relative.display());
            let new_header = format!("b/{}", relative.display());
            let unified = TextDiff::from_lines(file.original(), file.content())
                .unified_diff()
                .header(&old_header, &new_header)
                .context_radius(3)
                .to_string();
            diffs.push(FileDiff {
                path: file.path().to_path_buf(),
                unified_diff: unified,
            });
        }
        diffs
    }
}
