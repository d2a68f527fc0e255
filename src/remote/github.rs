//! GitHub contents API client.
//!
//! Directory listings come from `GET /repos/{owner}/{repo}/contents/{path}`
//! walked recursively, file bodies from the same endpoint with the raw media
//! type, and commit resolution from `GET /repos/{owner}/{repo}/commits/{ref}`.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use std::io::Read;
use std::time::Duration;

use super::{RemoteFetcher, RemoteRef};
use crate::error::{BrickError, Result};

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

#[derive(Debug, Deserialize)]
struct ContentItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Directory(Vec<ContentItem>),
    File(ContentItem),
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
}

/// Fetches remote templates over the GitHub REST API.
pub struct GitHubFetcher {
    client: Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl GitHubFetcher {
    /// Create a fetcher with the default 30-second timeout.
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_timeout(token, Duration::from_secs(30))
    }

    pub fn with_timeout(token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("brick/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| BrickError::RemoteFetchFailed {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: DEFAULT_API_URL.to_string(),
            token: token.filter(|t| !t.is_empty()),
            timeout,
        })
    }

    /// Point the fetcher at another API root (GitHub Enterprise, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn contents_url(&self, remote: &RemoteRef, path: &str) -> String {
        let base = format!(
            "{}/repos/{}/{}/contents",
            self.base_url, remote.owner, remote.repo
        );
        if path.is_empty() {
            base
        } else {
            format!("{}/{}", base, path)
        }
    }

    fn get(&self, url: &str, accept: &str) -> RequestBuilder {
        let request = self.client.get(url).header(ACCEPT, accept);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request.send().map_err(|e| BrickError::RemoteFetchFailed {
            message: format!("request for {} failed: {}", what, e),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match status {
            StatusCode::NOT_FOUND => format!("{} not found", what),
            StatusCode::UNAUTHORIZED => format!("GitHub rejected the token fetching {}", what),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => format!(
                "GitHub refused {} (HTTP {}); set a token with `brick config set githubToken <token>`",
                what, status
            ),
            _ => format!("HTTP {} fetching {}", status, what),
        };
        Err(BrickError::RemoteFetchFailed { message })
    }

    fn list_dir(&self, remote: &RemoteRef, dir: &str, files: &mut Vec<String>) -> Result<()> {
        let url = self.contents_url(remote, dir);
        tracing::debug!("Listing {}", url);

        let request = self
            .get(&url, JSON_MEDIA_TYPE)
            .query(&[("ref", remote.revision())]);
        let what = format!("{}/{}/{}@{}", remote.owner, remote.repo, dir, remote.revision());
        let response = self.send(request, &what)?;

        let items = match response.json::<ContentsResponse>() {
            Ok(ContentsResponse::Directory(items)) => items,
            Ok(ContentsResponse::File(_)) => {
                return Err(BrickError::RemoteFetchFailed {
                    message: format!("{} is a file, not a directory", what),
                })
            }
            Err(e) => {
                return Err(BrickError::RemoteFetchFailed {
                    message: format!("unexpected listing for {}: {}", what, e),
                })
            }
        };

        for item in items {
            match item.kind.as_str() {
                "file" => {
                    if let Some(relative) = strip_base(&remote.path, &item.path) {
                        files.push(relative);
                    }
                }
                "dir" => self.list_dir(remote, &item.path, files)?,
                other => tracing::debug!("Skipping {} entry {}", other, item.path),
            }
        }

        Ok(())
    }
}

impl RemoteFetcher for GitHubFetcher {
    fn list_files(&self, remote: &RemoteRef) -> Result<Vec<String>> {
        let mut files = Vec::new();
        self.list_dir(remote, &remote.path, &mut files)?;
        files.sort();
        Ok(files)
    }

    fn read_file(&self, remote: &RemoteRef, relative: &str) -> Result<Box<dyn Read>> {
        let full = if remote.path.is_empty() {
            relative.to_string()
        } else {
            format!("{}/{}", remote.path, relative)
        };
        let url = self.contents_url(remote, &full);
        tracing::debug!("Fetching {}", url);

        let request = self
            .get(&url, RAW_MEDIA_TYPE)
            .query(&[("ref", remote.revision())]);
        let what = format!("{}/{}/{}@{}", remote.owner, remote.repo, full, remote.revision());
        Ok(Box::new(self.send(request, &what)?))
    }

    fn resolve_commit(&self, remote: &RemoteRef) -> Result<String> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}",
            self.base_url, remote.owner, remote.repo, remote.git_ref
        );
        let what = format!("{}/{}@{}", remote.owner, remote.repo, remote.git_ref);
        let response = self.send(self.get(&url, JSON_MEDIA_TYPE), &what)?;

        let commit: CommitResponse =
            response.json().map_err(|e| BrickError::RemoteFetchFailed {
                message: format!("unexpected commit response for {}: {}", what, e),
            })?;
        Ok(commit.sha)
    }
}

/// Path of `full` relative to `base`, or `None` when it lies outside.
fn strip_base(base: &str, full: &str) -> Option<String> {
    if base.is_empty() {
        return Some(full.to_string());
    }
    full.strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('/'))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn fetcher(server: &MockServer) -> GitHubFetcher {
        GitHubFetcher::new(None).unwrap().with_base_url(server.base_url())
    }

    fn remote() -> RemoteRef {
        RemoteRef::new("acme", "kits", "react/button", "main")
    }

    #[test]
    fn default_timeout_is_30_seconds() {
        let fetcher = GitHubFetcher::new(None).unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn empty_token_is_ignored() {
        assert!(!GitHubFetcher::new(Some(String::new())).unwrap().has_token());
        assert!(GitHubFetcher::new(Some("t".into())).unwrap().has_token());
    }

    #[test]
    fn strip_base_handles_root_and_nested() {
        assert_eq!(strip_base("", "a/b.ts").as_deref(), Some("a/b.ts"));
        assert_eq!(strip_base("react", "react/x.ts").as_deref(), Some("x.ts"));
        assert_eq!(strip_base("react", "reactive/x.ts"), None);
    }

    #[test]
    fn list_files_walks_directories() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/kits/contents/react/button")
                .query_param("ref", "main");
            then.status(200).json_body(json!([
                {"name": "Button.tsx", "path": "react/button/Button.tsx", "type": "file"},
                {"name": "styles", "path": "react/button/styles", "type": "dir"}
            ]));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/kits/contents/react/button/styles")
                .query_param("ref", "main");
            then.status(200).json_body(json!([
                {"name": "button.css", "path": "react/button/styles/button.css", "type": "file"}
            ]));
        });

        let files = fetcher(&server).list_files(&remote()).unwrap();
        assert_eq!(files, vec!["Button.tsx", "styles/button.css"]);
    }

    #[test]
    fn read_file_uses_raw_media_type() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/kits/contents/react/button/Button.tsx")
                .header("accept", RAW_MEDIA_TYPE)
                .query_param("ref", "main");
            then.status(200).body("export const Button = () => null;");
        });

        let mut body = String::new();
        fetcher(&server)
            .read_file(&remote(), "Button.tsx")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();

        assert_eq!(body, "export const Button = () => null;");
        mock.assert();
    }

    #[test]
    fn read_file_streams_body_in_chunks() {
        let server = MockServer::start();
        let payload = "x".repeat(256 * 1024);
        server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/kits/contents/react/button/big.txt");
            then.status(200).body(payload.clone());
        });

        let mut reader = fetcher(&server).read_file(&remote(), "big.txt").unwrap();
        let mut chunk = [0u8; 4096];
        let mut total = 0;
        loop {
            let n = reader.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            total += n;
        }
        assert_eq!(total, payload.len());
    }

    #[test]
    fn pinned_commit_is_used_as_ref() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/kits/contents/react/button")
                .query_param("ref", "abc123");
            then.status(200).json_body(json!([]));
        });

        let pinned = remote().with_commit("abc123");
        assert!(fetcher(&server).list_files(&pinned).unwrap().is_empty());
        mock.assert();
    }

    #[test]
    fn token_is_sent_as_bearer() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/kits/commits/main")
                .header("authorization", "Bearer ghp_secret");
            then.status(200).json_body(json!({"sha": "deadbeef"}));
        });

        let fetcher = GitHubFetcher::new(Some("ghp_secret".into()))
            .unwrap()
            .with_base_url(server.base_url());
        assert_eq!(fetcher.resolve_commit(&remote()).unwrap(), "deadbeef");
        mock.assert();
    }

    #[test]
    fn not_found_is_remote_fetch_failure() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/kits/contents/react/button");
            then.status(404).body("Not Found");
        });

        let err = fetcher(&server).list_files(&remote()).unwrap_err();
        assert!(matches!(err, BrickError::RemoteFetchFailed { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn file_path_is_rejected_as_template_root() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/kits/contents/react/button");
            then.status(200)
                .json_body(json!({"name": "button", "path": "react/button", "type": "file"}));
        });

        let err = fetcher(&server).list_files(&remote()).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }
}
