//! Inclusion config: newline-delimited id list.
//!
//! Everything from `#` to end of line is a comment; blank lines are ignored.
//! An empty config means "include every discovered id".

use std::io::ErrorKind;
use std::path::Path;

use crate::error::{io_err, CoreError};
use crate::types::CanonicalId;

/// Ordered, comment-stripped inclusion filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InclusionConfig {
    ids: Vec<CanonicalId>,
}

impl InclusionConfig {
    /// Parse the textual form.
    pub fn parse(text: &str) -> Self {
        let mut ids: Vec<CanonicalId> = Vec::new();
        for line in text.lines() {
            let line = match line.find('#') {
                Some(idx) => &line[..idx],
                None => line,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let id = CanonicalId::from(line);
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self { ids }
    }

    /// Load from disk. A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(io_err(path, err)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[CanonicalId] {
        &self.ids
    }

    /// `true` when `id` passes the filter.
    pub fn includes(&self, id: &CanonicalId) -> bool {
        self.ids.is_empty() || self.ids.contains(id)
    }
}
