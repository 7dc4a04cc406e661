use crate::error::{Result, ScanError};
use crate::listing::{DirectoryEntry, parse_listing};
use crate::retry::{RetryConfig, retry};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const ACCEPT_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

const LISTING_CONTEXT: &str = "error during fetching file name.";
const FILE_CONTEXT: &str = "Error fetching file content: ";

/// Settings for [`GithubClient`], fixed for the lifetime of the client.
#[derive(Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub token: Option<String>,
    pub user_agent: String,
    pub timeout: Option<Duration>,
    pub retry: RetryConfig,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            token: None,
            user_agent: format!("repotree/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
            retry: RetryConfig::default(),
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ClientOptions {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// Client for the hosting API's repository contents endpoint.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    retry: RetryConfig,
}

impl fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.token.is_some())
            .field("retry", &self.retry)
            .finish()
    }
}

impl GithubClient {
    pub fn new(options: ClientOptions) -> Result<Self> {
        let base_url = Url::parse(&options.base_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", options.base_url, e)))?;
        if base_url.host_str().is_none() || base_url.cannot_be_a_base() {
            return Err(ScanError::InvalidUrl(format!(
                "{}: missing host",
                options.base_url
            )));
        }

        let mut builder = Client::builder().user_agent(options.user_agent);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            token: options.token.filter(|t| !t.is_empty()),
            retry: options.retry,
        })
    }

    /// Contents endpoint for `path`, each component pushed as its own
    /// percent-encoded segment. `.` and `..` components are rejected.
    pub fn contents_url(&self, owner: &str, repo: &str, path: &str) -> Result<Url> {
        for part in [owner, repo] {
            if part.is_empty() || part.contains('/') || is_dot_segment(part) {
                return Err(ScanError::InvalidPath(format!("{}/{}", owner, repo)));
            }
        }
        let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
        if components.iter().any(|c| is_dot_segment(c)) {
            return Err(ScanError::InvalidPath(path.to_string()));
        }

        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ScanError::InvalidUrl(self.base_url.to_string()))?;
            segments
                .pop_if_empty()
                .extend(["repos", owner, repo, "contents"])
                .extend(&components);
            // the root listing keeps its trailing slash
            if components.is_empty() {
                segments.push("");
            }
        }
        Ok(url)
    }

    /// List the immediate children of one directory. `""` is the root.
    pub async fn list_directory(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<DirectoryEntry>> {
        let payload = self.get_contents(owner, repo, path, LISTING_CONTEXT).await?;
        parse_listing(payload)
    }

    /// Fetch the raw contents payload for a single file.
    pub async fn fetch_file(&self, owner: &str, repo: &str, path: &str) -> Result<Value> {
        self.get_contents(owner, repo, path, FILE_CONTEXT).await
    }

    /// One GET against the contents endpoint, retried per the client's
    /// [`RetryConfig`].
    pub async fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        context: &str,
    ) -> Result<Value> {
        let url = self.contents_url(owner, repo, path)?;
        retry(&self.retry, || self.send(&url, context)).await
    }

    async fn send(&self, url: &Url, context: &str) -> Result<Value> {
        debug!("Fetching {}", url);

        let mut request = self
            .client
            .get(url.clone())
            .header(ACCEPT, ACCEPT_MEDIA_TYPE);
        if let Some(ref token) = self.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        let response = request.send().await.inspect_err(|e| {
            warn!("Request to {} failed: {}", url, e);
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("{} -> 404", url);
            return Err(ScanError::NotFound);
        }
        if !status.is_success() {
            warn!("{} -> {}", url, status.as_u16());
            return Err(ScanError::upstream(status.as_u16(), context));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| ScanError::MalformedResponse(format!("invalid JSON: {}", e)))
    }
}

fn is_dot_segment(component: &str) -> bool {
    component == "." || component == ".."
}
