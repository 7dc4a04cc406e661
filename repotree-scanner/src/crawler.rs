use crate::client::GithubClient;
use crate::error::{Result, ScanError};
use crate::listing::partition;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_WORKERS: usize = 16;

/// Called with `(depth, frontier)` before each level is expanded.
pub type LevelCallback = Arc<dyn Fn(usize, &[String]) + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub levels: usize,
    pub requests: usize,
    pub files: usize,
}

/// Breadth-first crawler that flattens a repository tree into file paths.
///
/// Each level of the tree is listed concurrently, at most `workers` requests
/// in flight, and fully joined before the next level starts. The first failed
/// listing aborts the crawl; no partial result is returned.
#[derive(Clone)]
pub struct TreeCrawler {
    client: GithubClient,
    workers: usize,
    level_callback: Option<LevelCallback>,
}

impl TreeCrawler {
    pub fn new(client: GithubClient) -> Self {
        Self {
            client,
            workers: DEFAULT_WORKERS,
            level_callback: None,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_level_callback(mut self, callback: LevelCallback) -> Self {
        self.level_callback = Some(callback);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn client(&self) -> &GithubClient {
        &self.client
    }

    pub async fn crawl(&self, owner: &str, repo: &str) -> Result<Vec<String>> {
        let (names, _) = self.crawl_with_stats(owner, repo).await?;
        Ok(names)
    }

    pub async fn crawl_with_stats(&self, owner: &str, repo: &str) -> Result<(Vec<String>, CrawlStats)> {
        info!("Starting crawl of {}/{} with {} workers", owner, repo, self.workers);

        let mut names = Vec::new();
        let mut frontier = vec![String::new()];
        let mut stats = CrawlStats::default();

        // One iteration per tree level, starting from the root listing
        while !frontier.is_empty() {
            if let Some(ref callback) = self.level_callback {
                callback(stats.levels, &frontier);
            }
            debug!("Level {}: expanding {} directories", stats.levels, frontier.len());

            stats.requests += frontier.len();
            // Abort on the first failed listing, nothing partial is returned
            frontier = self
                .expand_level(owner, repo, &frontier, &mut names)
                .await
                .inspect_err(|e| {
                    warn!("Crawl of {}/{} aborted at level {}: {}", owner, repo, stats.levels, e);
                })?;
            stats.levels += 1;
        }

        stats.files = names.len();
        info!(
            files = stats.files,
            levels = stats.levels,
            requests = stats.requests,
            "Crawl of {}/{} complete",
            owner,
            repo
        );
        Ok((names, stats))
    }

    /// List every directory in `frontier` and return the next frontier.
    ///
    /// File paths are appended to `names` as listings complete; this loop is
    /// the only writer. Subdirectories are returned in the order their parent
    /// requests were issued, regardless of completion order.
    async fn expand_level(
        &self,
        owner: &str,
        repo: &str,
        frontier: &[String],
        names: &mut Vec<String>,
    ) -> Result<Vec<String>> {
        // Fan out at most `workers` listings, tagged with their frontier index
        let mut listings = stream::iter(0..frontier.len())
            .map(|index| async move {
                let path = &frontier[index];
                let entries = self.client.list_directory(owner, repo, path).await?;
                Ok::<_, ScanError>((index, entries))
            })
            .buffer_unordered(self.workers);

        // Slot per parent so completion order does not reorder the next level
        let mut discovered: Vec<Vec<String>> = vec![Vec::new(); frontier.len()];

        while let Some((index, entries)) = listings.try_next().await? {
            let (files, dirs) = partition(entries);
            names.extend(files);
            discovered[index] = dirs;
        }

        // Dropping `listings` on error cancels any sibling still in flight
        Ok(discovered.into_iter().flatten().collect())
    }
}
