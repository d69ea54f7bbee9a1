//! GitHubGateway -- concrete [`RepositoryGateway`] implementation for GitHub.
//!
//! Commits a set of files atomically through the Git Data endpoints:
//! one blob per file, one tree layered on the branch head's tree, one
//! commit, one ref update. The remote either gains the full commit or
//! is left untouched.
//!
//! Tokens arrive per call, are wrapped in [`secrecy::SecretString`]
//! immediately, and are only exposed when building the Authorization
//! header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use pairforge_core::gateway::RepositoryGateway;
use pairforge_types::error::GatewayError;
use pairforge_types::gateway::{GatewayCommit, GatewayCommitRequest};

use super::types::{
    CommitResponse, NewBlob, NewCommit, NewRef, NewTree, NewTreeEntry, RefResponse, RepoResponse,
    ShaResponse, UpdateRef,
};

/// Per-request timeout; individual Git Data calls are small.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// GitHub repository gateway.
///
/// Implements [`RepositoryGateway`] against the GitHub REST API. The
/// gateway holds no credentials -- the token travels with each call so
/// different requests can use different identities.
pub struct GitHubGateway {
    client: reqwest::Client,
    api_base: String,
}

impl GitHubGateway {
    /// The GitHub API version header value.
    const API_VERSION: &'static str = "2022-11-28";

    /// The GitHub media type for REST v3 JSON responses.
    const ACCEPT: &'static str = "application/vnd.github+json";

    /// Create a gateway pointed at api.github.com.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent("pairforge")
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_base: "https://api.github.com".to_string(),
        }
    }

    /// Override the API base URL (GitHub Enterprise, tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Attach authentication and protocol headers to a request.
    fn authed(
        &self,
        builder: reqwest::RequestBuilder,
        token: &SecretString,
    ) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(token.expose_secret())
            .header("accept", Self::ACCEPT)
            .header("x-github-api-version", Self::API_VERSION)
    }

    /// Send a request and decode the JSON body, mapping failures to
    /// [`GatewayError`].
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = builder.send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_ms(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, &body, retry_after));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::UnexpectedResponse(format!("failed to parse response: {e}")))
    }

    /// Look up the head commit SHA of a branch.
    ///
    /// Returns `Ok(None)` when the branch does not exist; an unborn
    /// branch is a normal outcome, not an error.
    async fn find_branch_head(
        &self,
        token: &SecretString,
        repository: &str,
        branch: &str,
    ) -> Result<Option<String>, GatewayError> {
        let url = self.url(&format!("/repos/{repository}/git/ref/heads/{branch}"));
        let response = self
            .authed(self.client.get(&url), token)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let retry_after = retry_after_ms(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, &body, retry_after));
        }

        let reference: RefResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::UnexpectedResponse(format!("failed to parse response: {e}")))?;
        Ok(Some(reference.object.sha))
    }
}

impl Default for GitHubGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryGateway for GitHubGateway {
    async fn commit_files(
        &self,
        token: &str,
        request: &GatewayCommitRequest,
    ) -> Result<GatewayCommit, GatewayError> {
        let token = SecretString::from(token.to_string());
        let repository = &request.repository;

        // Resolve the commit the new one builds on. A missing target
        // branch is forked from the repository's default branch.
        let (base_sha, branch_created) = match self
            .find_branch_head(&token, repository, &request.branch)
            .await?
        {
            Some(sha) => (sha, false),
            None => {
                let repo: RepoResponse = self
                    .execute(self.authed(
                        self.client.get(self.url(&format!("/repos/{repository}"))),
                        &token,
                    ))
                    .await?;
                debug!(
                    repository = %repository,
                    branch = %request.branch,
                    default_branch = %repo.default_branch,
                    "target branch missing, forking from default branch"
                );
                let sha = self
                    .find_branch_head(&token, repository, &repo.default_branch)
                    .await?
                    .ok_or_else(|| {
                        GatewayError::NotFound(format!(
                            "default branch '{}' has no head in '{repository}'",
                            repo.default_branch
                        ))
                    })?;
                (sha, true)
            }
        };

        let base: CommitResponse = self
            .execute(self.authed(
                self.client
                    .get(self.url(&format!("/repos/{repository}/git/commits/{base_sha}"))),
                &token,
            ))
            .await?;

        // One blob per file, then a single tree layered on the base
        // commit's tree so files outside the request survive.
        let mut entries = Vec::with_capacity(request.files.len());
        for file in &request.files {
            let blob: ShaResponse = self
                .execute(self.authed(
                    self.client
                        .post(self.url(&format!("/repos/{repository}/git/blobs")))
                        .json(&NewBlob::utf8(file.content.clone())),
                    &token,
                ))
                .await?;
            entries.push(NewTreeEntry::blob(request.full_path(&file.path), blob.sha));
        }

        let tree: ShaResponse = self
            .execute(self.authed(
                self.client
                    .post(self.url(&format!("/repos/{repository}/git/trees")))
                    .json(&NewTree {
                        base_tree: base.tree.sha,
                        tree: entries,
                    }),
                &token,
            ))
            .await?;

        let commit: CommitResponse = self
            .execute(self.authed(
                self.client
                    .post(self.url(&format!("/repos/{repository}/git/commits")))
                    .json(&NewCommit {
                        message: request.message.clone(),
                        tree: tree.sha,
                        parents: vec![base_sha],
                    }),
                &token,
            ))
            .await?;

        // Point the branch at the new commit. The update is non-forced,
        // so a concurrent push to the same branch fails with RefConflict
        // instead of being overwritten.
        if branch_created {
            let _: RefResponse = self
                .execute(self.authed(
                    self.client
                        .post(self.url(&format!("/repos/{repository}/git/refs")))
                        .json(&NewRef {
                            git_ref: format!("refs/heads/{}", request.branch),
                            sha: commit.sha.clone(),
                        }),
                    &token,
                ))
                .await?;
        } else {
            let _: RefResponse = self
                .execute(self.authed(
                    self.client
                        .patch(self.url(&format!(
                            "/repos/{repository}/git/refs/heads/{}",
                            request.branch
                        )))
                        .json(&UpdateRef {
                            sha: commit.sha.clone(),
                            force: false,
                        }),
                    &token,
                ))
                .await?;
        }

        Ok(GatewayCommit {
            sha: commit.sha,
            branch: request.branch.clone(),
            branch_created,
        })
    }
}

/// Map a transport-level failure to [`GatewayError`].
fn request_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout(REQUEST_TIMEOUT_SECS)
    } else {
        GatewayError::Network(format!("HTTP request failed: {e}"))
    }
}

/// Map a non-success HTTP status to [`GatewayError`].
///
/// GitHub reports secondary rate limits as 403 with a "rate limit"
/// phrase in the body, so 403 is split between [`GatewayError::RateLimited`]
/// and [`GatewayError::PermissionDenied`].
fn map_status(status: reqwest::StatusCode, body: &str, retry_after_ms: Option<u64>) -> GatewayError {
    match status.as_u16() {
        401 => GatewayError::AuthenticationFailed,
        403 if body.to_ascii_lowercase().contains("rate limit") => GatewayError::RateLimited {
            retry_after_ms,
        },
        403 => GatewayError::PermissionDenied(truncate_body(body)),
        404 => GatewayError::NotFound(truncate_body(body)),
        409 | 422 => GatewayError::RefConflict(truncate_body(body)),
        429 => GatewayError::RateLimited { retry_after_ms },
        _ => GatewayError::UnexpectedResponse(format!("HTTP {status}: {}", truncate_body(body))),
    }
}

/// Read the Retry-After header (seconds) as milliseconds.
fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    let secs: u64 = headers.get("retry-after")?.to_str().ok()?.trim().parse().ok()?;
    Some(secs.saturating_mul(1000))
}

/// Keep error bodies log-sized; char-based so multi-byte text cannot
/// split mid-character.
fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    if body.chars().count() <= MAX_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_CHARS).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_with_api_base_trims_trailing_slash() {
        let gateway = GitHubGateway::new().with_api_base("https://ghe.example.com/api/v3/");
        assert_eq!(
            gateway.url("/repos/octo/site"),
            "https://ghe.example.com/api/v3/repos/octo/site"
        );
    }

    #[test]
    fn test_map_status_unauthorized() {
        let err = map_status(StatusCode::UNAUTHORIZED, "Bad credentials", None);
        assert!(matches!(err, GatewayError::AuthenticationFailed));
    }

    #[test]
    fn test_map_status_forbidden_rate_limit() {
        let err = map_status(
            StatusCode::FORBIDDEN,
            "API rate limit exceeded for installation",
            Some(30_000),
        );
        assert!(matches!(
            err,
            GatewayError::RateLimited {
                retry_after_ms: Some(30_000)
            }
        ));
    }

    #[test]
    fn test_map_status_forbidden_permission() {
        let err = map_status(StatusCode::FORBIDDEN, "Resource not accessible", None);
        match err {
            GatewayError::PermissionDenied(body) => assert!(body.contains("not accessible")),
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[test]
    fn test_map_status_not_found() {
        let err = map_status(StatusCode::NOT_FOUND, "Not Found", None);
        assert!(matches!(err, GatewayError::NotFound(_)));
    }

    #[test]
    fn test_map_status_unprocessable_is_ref_conflict() {
        let err = map_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Update is not a fast forward",
            None,
        );
        assert!(matches!(err, GatewayError::RefConflict(_)));
    }

    #[test]
    fn test_map_status_too_many_requests() {
        let err = map_status(StatusCode::TOO_MANY_REQUESTS, "slow down", Some(1_000));
        assert!(matches!(
            err,
            GatewayError::RateLimited {
                retry_after_ms: Some(1_000)
            }
        ));
    }

    #[test]
    fn test_map_status_unexpected() {
        let err = map_status(StatusCode::BAD_GATEWAY, "upstream error", None);
        match err {
            GatewayError::UnexpectedResponse(msg) => {
                assert!(msg.contains("502"));
                assert!(msg.contains("upstream error"));
            }
            other => panic!("expected UnexpectedResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_retry_after_header_converted_to_ms() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("retry-after", "12".parse().unwrap());
        assert_eq!(retry_after_ms(&headers), Some(12_000));

        headers.insert("retry-after", "soon".parse().unwrap());
        assert_eq!(retry_after_ms(&headers), None);
    }

    #[test]
    fn test_truncate_body_short_passthrough() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn test_truncate_body_long_multibyte() {
        let body = "é".repeat(300);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.chars().count(), 203);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_new_tree_entry_wire_shape() {
        let entry = NewTreeEntry::blob("src/main.py", "abc123");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["path"], "src/main.py");
        assert_eq!(json["mode"], "100644");
        assert_eq!(json["type"], "blob");
        assert_eq!(json["sha"], "abc123");
    }

    #[test]
    fn test_new_ref_wire_shape() {
        let new_ref = NewRef {
            git_ref: "refs/heads/pairforge".to_string(),
            sha: "abc123".to_string(),
        };
        let json = serde_json::to_value(&new_ref).unwrap();
        assert_eq!(json["ref"], "refs/heads/pairforge");
        assert!(json.get("git_ref").is_none());
    }

    #[test]
    fn test_new_blob_defaults_to_utf8() {
        let blob = NewBlob::utf8("print('hi')");
        let json = serde_json::to_value(&blob).unwrap();
        assert_eq!(json["encoding"], "utf-8");
        assert_eq!(json["content"], "print('hi')");
    }
}
