//! Revision-history API.
//!
//! [`GithubClient`] talks to the GitHub REST v3 API with `ureq`. Lists are
//! fetched one page at a time with no retry; the first failed page aborts
//! the listing.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ReleaseError;

/// Page size requested from list endpoints.
pub const PER_PAGE: usize = 100;

/// A merged pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    #[serde(default)]
    pub merge_commit_sha: Option<String>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

pub trait RevisionHistory {
    fn list_tags(&self) -> Result<Vec<String>, ReleaseError>;
    fn list_merged_prs(&self) -> Result<Vec<PullRequest>, ReleaseError>;
    /// Commit SHAs reachable from `head` but not from `base`.
    fn compare(&self, base: &str, head: &str) -> Result<Vec<String>, ReleaseError>;
}

/// Collect pages from `fetch(1)`, `fetch(2)`, … until a short page.
pub fn paginate<T, F>(mut fetch: F) -> Result<Vec<T>, ReleaseError>
where
    F: FnMut(u32) -> Result<Vec<T>, ReleaseError>,
{
    let mut all = Vec::new();
    let mut page = 1;
    loop {
        let items = fetch(page)?;
        let done = items.len() < PER_PAGE;
        all.extend(items);
        if done {
            return Ok(all);
        }
        page += 1;
    }
}

#[derive(Deserialize)]
struct TagRef {
    name: String,
}

#[derive(Deserialize)]
struct Comparison {
    commits: Vec<CommitRef>,
}

#[derive(Deserialize)]
struct CommitRef {
    sha: String,
}

pub struct GithubClient {
    agent: ureq::Agent,
    api_base: String,
    repository: String,
    token: Option<String>,
}

impl GithubClient {
    /// `repository` is `owner/name`.
    pub fn new(api_base: &str, repository: &str, token: Option<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(concat!("syncwright/", env!("CARGO_PKG_VERSION")))
                .build(),
            api_base: api_base.trim_end_matches('/').to_string(),
            repository: repository.to_string(),
            token,
        }
    }

    /// Same as [`GithubClient::new`], with the token read from `GITHUB_TOKEN`.
    pub fn from_env(api_base: &str, repository: &str) -> Self {
        let token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        Self::new(api_base, repository, token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}", self.api_base, self.repository, path)
    }

    fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T, ReleaseError> {
        tracing::debug!(url, ?query, "GET");
        let mut request = self
            .agent
            .get(url)
            .set("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        for (key, value) in query {
            request = request.query(key, value);
        }

        let response = request.call().map_err(|e| ReleaseError::Http {
            url: url.to_string(),
            source: Box::new(e),
        })?;
        response.into_json().map_err(|e| ReleaseError::Decode {
            url: url.to_string(),
            source: e,
        })
    }

    fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        page: u32,
        extra: &[(&str, &str)],
    ) -> Result<T, ReleaseError> {
        let page = page.to_string();
        let per_page = PER_PAGE.to_string();
        let mut query = vec![("per_page", per_page.as_str()), ("page", page.as_str())];
        query.extend_from_slice(extra);
        self.get(url, &query)
    }
}

impl RevisionHistory for GithubClient {
    fn list_tags(&self) -> Result<Vec<String>, ReleaseError> {
        let url = self.url("tags");
        let tags: Vec<TagRef> = paginate(|page| self.get_page(&url, page, &[]))?;
        Ok(tags.into_iter().map(|t| t.name).collect())
    }

    fn list_merged_prs(&self) -> Result<Vec<PullRequest>, ReleaseError> {
        let url = self.url("pulls");
        let prs: Vec<PullRequest> =
            paginate(|page| self.get_page(&url, page, &[("state", "closed")]))?;
        Ok(prs.into_iter().filter(|pr| pr.merged_at.is_some()).collect())
    }

    fn compare(&self, base: &str, head: &str) -> Result<Vec<String>, ReleaseError> {
        // The commit list of a comparison is paged like any list endpoint.
        let url = self.url(&format!("compare/{base}...{head}"));
        let commits: Vec<CommitRef> =
            paginate(|page| self.get_page::<Comparison>(&url, page, &[]).map(|c| c.commits))?;
        Ok(commits.into_iter().map(|c| c.sha).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_stops_after_short_page() {
        let mut requested = Vec::new();
        let all = paginate(|page| {
            requested.push(page);
            let len = if page < 3 { PER_PAGE } else { 7 };
            Ok(vec![page; len])
        })
        .unwrap();
        assert_eq!(requested, vec![1, 2, 3]);
        assert_eq!(all.len(), 2 * PER_PAGE + 7);
    }

    #[test]
    fn paginate_aborts_on_failed_page() {
        let err = paginate::<u32, _>(|page| {
            if page == 2 {
                Err(ReleaseError::MalformedTag {
                    tag: "page".into(),
                    reason: "boom",
                })
            } else {
                Ok(vec![0; PER_PAGE])
            }
        })
        .unwrap_err();
        assert!(matches!(err, ReleaseError::MalformedTag { .. }));
    }

    #[test]
    fn pull_request_decodes_merge_fields() {
        let pr: PullRequest = serde_json::from_str(
            r#"{"number": 12, "title": "fix", "html_url": "https://x/12",
                "merge_commit_sha": "abc", "merged_at": "2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(pr.merge_commit_sha.as_deref(), Some("abc"));
        assert!(pr.merged_at.is_some());

        let open: PullRequest =
            serde_json::from_str(r#"{"number": 1, "title": "t", "html_url": "u", "merged_at": null}"#)
                .unwrap();
        assert!(open.merged_at.is_none());
    }

    /// Answers `requests` HTTP calls on loopback, one connection each,
    /// with the body `respond(page)` picks from the `page` query parameter.
    fn serve_pages(
        requests: usize,
        respond: impl Fn(u32) -> String + Send + 'static,
    ) -> (String, std::thread::JoinHandle<Vec<String>>) {
        use std::io::{BufRead, BufReader, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let mut seen = Vec::new();
            for stream in listener.incoming().take(requests) {
                let mut stream = stream.unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                let mut header = String::new();
                while reader.read_line(&mut header).unwrap() > 2 {
                    header.clear();
                }
                let target = request_line.split_whitespace().nth(1).unwrap().to_string();
                let page = target
                    .split(['?', '&'])
                    .find_map(|kv| kv.strip_prefix("page="))
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(1);
                let body = respond(page);
                write!(
                    stream,
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                )
                .unwrap();
                seen.push(target);
            }
            seen
        });
        (base, handle)
    }

    #[test]
    fn compare_follows_commit_pages() {
        let (base, server) = serve_pages(2, |page| {
            let count = if page == 1 { PER_PAGE } else { 3 };
            let commits: Vec<_> = (0..count)
                .map(|i| serde_json::json!({ "sha": format!("p{page}-{i}") }))
                .collect();
            serde_json::json!({ "commits": commits }).to_string()
        });

        let client = GithubClient::new(&base, "ccxt/ccxt", None);
        let shas = client.compare("1.0.1", "1.1.1").unwrap();
        let requested = server.join().unwrap();

        assert_eq!(shas.len(), PER_PAGE + 3);
        assert_eq!(shas.last().map(String::as_str), Some("p2-2"));
        assert_eq!(requested.len(), 2);
        assert!(requested[0].starts_with("/repos/ccxt/ccxt/compare/1.0.1...1.1.1?"));
        assert!(requested[1].contains("page=2"));
    }

    #[test]
    fn urls_are_scoped_to_repository() {
        let client = GithubClient::new("https://api.github.com/", "ccxt/ccxt", None);
        assert_eq!(client.url("tags"), "https://api.github.com/repos/ccxt/ccxt/tags");
    }
}
