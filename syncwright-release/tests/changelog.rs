//! Changelog generation against a scripted revision history.

use std::collections::HashMap;

use syncwright_release::{
    build_changelog, render_markdown, write_changelog, PullRequest, ReleaseError, RevisionHistory,
};

struct FakeHistory {
    tags: Vec<&'static str>,
    pulls: Vec<PullRequest>,
    ranges: HashMap<(&'static str, &'static str), Vec<&'static str>>,
    fail_pulls: bool,
}

impl RevisionHistory for FakeHistory {
    fn list_tags(&self) -> Result<Vec<String>, ReleaseError> {
        Ok(self.tags.iter().map(|t| t.to_string()).collect())
    }

    fn list_merged_prs(&self) -> Result<Vec<PullRequest>, ReleaseError> {
        if self.fail_pulls {
            return Err(ReleaseError::Decode {
                url: "https://api.example/pulls?page=2".into(),
                source: std::io::Error::other("truncated body"),
            });
        }
        Ok(self.pulls.clone())
    }

    fn compare(&self, base: &str, head: &str) -> Result<Vec<String>, ReleaseError> {
        Ok(self
            .ranges
            .iter()
            .find(|((b, h), _)| *b == base && *h == head)
            .map(|(_, shas)| shas.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default())
    }
}

fn pr(number: u64, title: &str, sha: &str) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        html_url: format!("https://github.com/o/r/pull/{number}"),
        merge_commit_sha: Some(sha.to_string()),
        merged_at: Some("2024-01-01T00:00:00Z".parse().unwrap()),
    }
}

fn history() -> FakeHistory {
    FakeHistory {
        // Unsorted and with a non-release tag, as the API returns them.
        tags: vec!["1.0.10", "1.0.2", "nightly", "1.0.9"],
        pulls: vec![pr(3, "Add beta", "c3"), pr(1, "Fix alpha", "c1"), pr(2, "Docs", "c2")],
        ranges: HashMap::from([
            (("1.0.2", "1.0.9"), vec!["c1", "x"]),
            (("1.0.9", "1.0.10"), vec!["c2", "c3"]),
        ]),
        fail_pulls: false,
    }
}

#[test]
fn pulls_grouped_by_tag_newest_first() {
    let releases = build_changelog(&history()).unwrap();
    let md = render_markdown(&releases);
    assert_eq!(
        md,
        "## 1.0.10\n\n\
         - Docs ([#2](https://github.com/o/r/pull/2))\n\
         - Add beta ([#3](https://github.com/o/r/pull/3))\n\
         \n\
         ## 1.0.9\n\n\
         - Fix alpha ([#1](https://github.com/o/r/pull/1))\n"
    );
}

#[test]
fn failed_page_aborts_generation() {
    let mut h = history();
    h.fail_pulls = true;
    let err = build_changelog(&h).unwrap_err();
    assert!(matches!(err, ReleaseError::Decode { .. }));
}

#[test]
fn changelog_written_atomically() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("CHANGELOG.md");
    let releases = build_changelog(&history()).unwrap();

    assert!(write_changelog(&path, &releases, false).unwrap().is_change());
    assert!(!write_changelog(&path, &releases, false).unwrap().is_change());
    assert!(std::fs::read_to_string(&path).unwrap().starts_with("## 1.0.10\n"));
}
