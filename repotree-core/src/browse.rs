use crate::content::{FileContent, decode_file};
use crate::error::BrowseError;
use crate::repo::{RepoRef, parse_repo_url};
use repotree_scanner::{GithubClient, TreeCrawler};
use tracing::{debug, info};

/// The two browse operations: list every file of a repository and fetch one
/// file's content.
///
/// Holds no per-request state; every call re-crawls from the root.
#[derive(Clone)]
pub struct RepoBrowser {
    crawler: TreeCrawler,
}

impl RepoBrowser {
    pub fn new(client: GithubClient, workers: usize) -> Self {
        Self {
            crawler: TreeCrawler::new(client).with_workers(workers),
        }
    }

    pub async fn list_repo_files(&self, repo_url: &str) -> Result<Vec<String>, BrowseError> {
        let repo = parse_repo_url(repo_url)?;
        self.list_files(&repo).await
    }

    pub async fn list_files(&self, repo: &RepoRef) -> Result<Vec<String>, BrowseError> {
        let names = self.crawler.crawl(repo.owner(), repo.name()).await?;
        info!("Total files in {}: {}", repo, names.len());
        Ok(names)
    }

    pub async fn fetch_file_content(
        &self,
        repo_url: &str,
        file_path: &str,
    ) -> Result<FileContent, BrowseError> {
        let repo = parse_repo_url(repo_url)?;
        self.fetch_file(&repo, file_path).await
    }

    pub async fn fetch_file(&self, repo: &RepoRef, file_path: &str) -> Result<FileContent, BrowseError> {
        if file_path.trim().is_empty() {
            return Err(BrowseError::InvalidInput("file path must not be empty".to_string()));
        }
        if file_path.split('/').any(|c| c == "." || c == "..") {
            return Err(BrowseError::InvalidInput(format!(
                "file path must not contain '.' or '..' segments: {}",
                file_path
            )));
        }

        debug!("Fetching {} from {}", file_path, repo);
        let payload = self
            .crawler
            .client()
            .fetch_file(repo.owner(), repo.name(), file_path)
            .await?;

        decode_file(file_path, &payload)
    }
}
