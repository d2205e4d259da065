//! Tag retention.
//!
//! Tags are grouped into buckets by `major.minor`. The five most recent
//! buckets are kept whole; older buckets keep only their `x.y.1` tag.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::ReleaseError;
use crate::git::TagStore;

/// Number of most recent `major.minor` buckets retained in full.
pub const KEEP_BUCKETS: usize = 5;

/// Major and minor must stay below this for the bucket key to be unique.
const COMPONENT_LIMIT: u32 = 100;

/// A `major.minor.patch` release tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Tag {
    pub name: String,
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Tag {
    /// Parse a strict `<digits>.<digits>.<digits>` tag.
    pub fn parse(name: &str) -> Result<Self, ReleaseError> {
        let malformed = |reason: &'static str| ReleaseError::MalformedTag {
            tag: name.to_string(),
            reason,
        };

        let parts: Vec<&str> = name.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(malformed("expected major.minor.patch"));
        };
        let number = |part: &str| -> Result<u32, ReleaseError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed("components must be decimal digits"));
            }
            part.parse().map_err(|_| malformed("component out of range"))
        };

        let tag = Self {
            name: name.to_string(),
            major: number(*major)?,
            minor: number(*minor)?,
            patch: number(*patch)?,
        };
        if tag.major >= COMPONENT_LIMIT || tag.minor >= COMPONENT_LIMIT {
            return Err(malformed("major and minor must be below 100"));
        }
        Ok(tag)
    }

    /// `major * 100 + minor`.
    pub fn bucket(&self) -> u32 {
        self.major * COMPONENT_LIMIT + self.minor
    }

    fn key(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key()).then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Which tags survive and which are marked for deletion, both ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetentionPlan {
    pub keep: Vec<Tag>,
    pub delete: Vec<Tag>,
}

impl RetentionPlan {
    /// Cap deletions to the `limit` most recent ones.
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        if let Some(limit) = limit {
            let skip = self.delete.len().saturating_sub(limit);
            self.delete.drain(..skip);
        }
        self
    }
}

/// Build the retention plan. Any malformed tag fails the whole plan.
pub fn plan_retention<S: AsRef<str>>(names: &[S]) -> Result<RetentionPlan, ReleaseError> {
    let mut buckets: BTreeMap<u32, Vec<Tag>> = BTreeMap::new();
    for name in names {
        let tag = Tag::parse(name.as_ref())?;
        buckets.entry(tag.bucket()).or_default().push(tag);
    }

    let recent_from = buckets.len().saturating_sub(KEEP_BUCKETS);
    let mut plan = RetentionPlan::default();
    for (index, (_, tags)) in buckets.into_iter().enumerate() {
        for tag in tags {
            if index >= recent_from || tag.patch == 1 {
                plan.keep.push(tag);
            } else {
                plan.delete.push(tag);
            }
        }
    }
    plan.keep.sort();
    plan.delete.sort();
    Ok(plan)
}

/// Result of deleting one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum DeletionOutcome {
    /// Dry run: nothing was touched.
    Planned,
    Deleted,
    /// Local removal failed; the remote was not contacted.
    LocalFailed(String),
    /// Local tag is gone but the remote still has it. Needs manual fixup.
    RemoteFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagDeletion {
    pub tag: String,
    #[serde(flatten)]
    pub outcome: DeletionOutcome,
}

impl TagDeletion {
    pub fn needs_fixup(&self) -> bool {
        matches!(self.outcome, DeletionOutcome::RemoteFailed(_))
    }
}

/// Delete every tag of `plan.delete`, newest first: local then remote.
///
/// Nothing is rolled back. With `dry_run` every tag is only logged.
pub fn delete_tags(plan: &RetentionPlan, store: &dyn TagStore, dry_run: bool) -> Vec<TagDeletion> {
    plan.delete
        .iter()
        .rev()
        .map(|tag| {
            let outcome = if dry_run {
                tracing::info!(tag = %tag, "[dry-run] would delete tag");
                DeletionOutcome::Planned
            } else {
                delete_one(tag, store)
            };
            TagDeletion {
                tag: tag.name.clone(),
                outcome,
            }
        })
        .collect()
}

fn delete_one(tag: &Tag, store: &dyn TagStore) -> DeletionOutcome {
    tracing::info!(tag = %tag, "deleting local tag");
    if let Err(err) = store.delete_local(&tag.name) {
        tracing::warn!(tag = %tag, error = %err, "local tag deletion failed");
        return DeletionOutcome::LocalFailed(err.to_string());
    }
    tracing::info!(tag = %tag, "deleting remote tag");
    match store.delete_remote(&tag.name) {
        Ok(()) => DeletionOutcome::Deleted,
        Err(err) => {
            tracing::warn!(tag = %tag, error = %err, "remote tag deletion failed, manual fixup needed");
            DeletionOutcome::RemoteFailed(err.to_string())
        }
    }
}
