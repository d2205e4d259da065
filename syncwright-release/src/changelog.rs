//! Changelog grouped by release tag.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

use syncwright_sync::{atomic_write, WriteOutcome};

use crate::error::ReleaseError;
use crate::history::{PullRequest, RevisionHistory};
use crate::tags::Tag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub tag: String,
    pub pulls: Vec<PullRequest>,
}

/// Releases newest first. A PR is listed under the first tag whose
/// comparison with the previous tag contains its merge commit.
pub fn build_changelog(history: &dyn RevisionHistory) -> Result<Vec<Release>, ReleaseError> {
    let mut tags = Vec::new();
    for name in history.list_tags()? {
        match Tag::parse(&name) {
            Ok(tag) => tags.push(tag),
            Err(err) => tracing::debug!(error = %err, "skipping tag"),
        }
    }
    tags.sort();

    let mut pulls = history.list_merged_prs()?;
    pulls.sort_by_key(|pr| pr.number);
    tracing::info!(tags = tags.len(), pulls = pulls.len(), "building changelog");

    let mut listed: HashSet<u64> = HashSet::new();
    let mut releases = Vec::new();
    for pair in tags.windows(2) {
        let [prev, tag] = pair else { continue };
        let commits: HashSet<String> = history.compare(&prev.name, &tag.name)?.into_iter().collect();
        let in_range: Vec<PullRequest> = pulls
            .iter()
            .filter(|pr| !listed.contains(&pr.number))
            .filter(|pr| {
                pr.merge_commit_sha
                    .as_ref()
                    .is_some_and(|sha| commits.contains(sha))
            })
            .cloned()
            .collect();
        listed.extend(in_range.iter().map(|pr| pr.number));
        releases.push(Release {
            tag: tag.name.clone(),
            pulls: in_range,
        });
    }
    releases.reverse();
    Ok(releases)
}

/// `## <tag>` then one `- <title> ([#N](url))` line per PR.
pub fn render_markdown(releases: &[Release]) -> String {
    let mut out = String::new();
    for (index, release) in releases.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "## {}", release.tag);
        if !release.pulls.is_empty() {
            out.push('\n');
        }
        for pr in &release.pulls {
            let _ = writeln!(out, "- {} ([#{}]({}))", pr.title.trim(), pr.number, pr.html_url);
        }
    }
    out
}

pub fn write_changelog(
    path: &Path,
    releases: &[Release],
    dry_run: bool,
) -> Result<WriteOutcome, ReleaseError> {
    tracing::info!(destination = %path.display(), releases = releases.len(), "writing changelog");
    Ok(atomic_write(path, &render_markdown(releases), dry_run)?)
}
