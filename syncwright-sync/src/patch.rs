//! File patch engine.
//!
//! An [`ArtifactFile`] holds one generated file in memory. Patches are
//! applied to it in order through [`Anchor`]s and the result is committed
//! once with [`atomic_write`].
//!
//! ## `atomic_write` protocol
//!
//! 1. Normalise line endings to LF.
//! 2. Compare with the current on-disk content, skip if identical.
//! 3. Write to `<path>.syncwright.tmp`.
//! 4. Rename to the final path. Remove the tmp file if the rename fails.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use regex::{Captures, Regex};

use syncwright_core::MatchScope;

use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// Write outcome
// ---------------------------------------------------------------------------

/// Outcome of committing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped: new content equals the on-disk content.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Written { path }
            | WriteOutcome::Unchanged { path }
            | WriteOutcome::WouldWrite { path } => path,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, WriteOutcome::Unchanged { .. })
    }
}

// ---------------------------------------------------------------------------
// Anchor
// ---------------------------------------------------------------------------

/// A compiled structural marker locating a replaceable block.
#[derive(Debug, Clone)]
pub struct Anchor {
    regex: Regex,
    scope: MatchScope,
    unique: bool,
    required: bool,
}

impl Anchor {
    /// Mandatory, first-match anchor.
    pub fn new(pattern: &str) -> Result<Self, SyncError> {
        let regex = Regex::new(pattern).map_err(|source| SyncError::InvalidAnchor {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            regex,
            scope: MatchScope::First,
            unique: false,
            required: true,
        })
    }

    pub fn scope(mut self, scope: MatchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Reject files where the pattern matches more than once.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Zero matches is a no-op instead of [`SyncError::PatternNotFound`].
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

// ---------------------------------------------------------------------------
// ArtifactFile
// ---------------------------------------------------------------------------

/// A generated file loaded for patching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    path: PathBuf,
    original: String,
    content: String,
}

impl ArtifactFile {
    /// Load an existing file. Line endings are normalised to LF.
    pub fn open(path: &Path) -> Result<Self, SyncError> {
        let raw = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let original = normalize_line_endings(&raw);
        Ok(Self {
            path: path.to_path_buf(),
            content: original.clone(),
            original,
        })
    }

    /// Load `path`, or start from empty content when it does not exist yet.
    pub fn open_or_new(path: &Path) -> Result<Self, SyncError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => {
                let original = normalize_line_endings(&raw);
                Ok(Self {
                    path: path.to_path_buf(),
                    content: original.clone(),
                    original,
                })
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self {
                path: path.to_path_buf(),
                original: String::new(),
                content: String::new(),
            }),
            Err(err) => Err(io_err(path, err)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content as it was when the file was loaded.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn is_modified(&self) -> bool {
        self.content != self.original
    }

    /// Replace the whole content.
    pub fn set_content(&mut self, content: &str) {
        self.content = normalize_line_endings(content);
    }

    /// Replace the anchored match(es) with `replacement`, taken literally.
    ///
    /// Returns the number of matches replaced.
    pub fn apply(&mut self, anchor: &Anchor, replacement: &str) -> Result<usize, SyncError> {
        self.apply_with(anchor, |_: &Captures<'_>| replacement.to_string())
    }

    /// Replace the anchored match(es) with the output of `render`.
    pub fn apply_with<F>(&mut self, anchor: &Anchor, mut render: F) -> Result<usize, SyncError>
    where
        F: FnMut(&Captures<'_>) -> String,
    {
        let matches = anchor.regex.find_iter(&self.content).count();
        if matches == 0 {
            if anchor.required {
                return Err(SyncError::PatternNotFound {
                    path: self.path.clone(),
                    anchor: anchor.as_str().to_string(),
                });
            }
            tracing::debug!("no match for {} in {}", anchor.as_str(), self.path.display());
            return Ok(0);
        }
        if anchor.unique && matches > 1 {
            return Err(SyncError::AmbiguousAnchor {
                path: self.path.clone(),
                anchor: anchor.as_str().to_string(),
                matches,
            });
        }

        let limit = match anchor.scope {
            MatchScope::First => 1,
            MatchScope::All => 0,
        };
        let replaced = anchor
            .regex
            .replacen(&self.content, limit, |caps: &Captures<'_>| {
                let text = render(caps);
                normalize_line_endings(&text)
            })
            .into_owned();
        self.content = replaced;
        Ok(if limit == 0 { matches } else { 1 })
    }

    /// Write the content back through [`atomic_write`].
    pub fn commit(&self, dry_run: bool) -> Result<WriteOutcome, SyncError> {
        atomic_write(&self.path, &self.content, dry_run)
    }
}

/// One-shot patch: load `path`, replace `anchor` with `replacement`, commit.
pub fn apply_patch(
    path: &Path,
    anchor: &Anchor,
    replacement: &str,
    dry_run: bool,
) -> Result<WriteOutcome, SyncError> {
    let mut file = ArtifactFile::open(path)?;
    file.apply(anchor, replacement)?;
    file.commit(dry_run)
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

/// Atomically write `content` to `path` unless it already holds that content.
pub fn atomic_write(path: &Path, content: &str, dry_run: bool) -> Result<WriteOutcome, SyncError> {
    let tmp = tmp_path(path);
    atomic_write_with_tmp(path, content, dry_run, &tmp)
}

/// Sibling tmp file used while committing `path`.
pub fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.syncwright.tmp", path.display()))
}

fn atomic_write_with_tmp(
    path: &Path,
    content: &str,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteOutcome, SyncError> {
    let normalized = normalize_line_endings(content);
    let content = normalized.as_str();

    match std::fs::read_to_string(path) {
        Ok(existing) if normalize_line_endings(&existing) == content => {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteOutcome::Unchanged {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(io_err(path, err)),
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteOutcome::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    tracing::info!("writing: {}", path.display());
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    Ok(WriteOutcome::Written {
        path: path.to_path_buf(),
    })
}

pub(crate) fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
