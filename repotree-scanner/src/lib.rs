pub mod client;
pub mod crawler;
pub mod error;
pub mod listing;
pub mod retry;

pub use client::{ClientOptions, GithubClient};
pub use crawler::{CrawlStats, LevelCallback, TreeCrawler};
pub use error::ScanError;
pub use listing::{DirectoryEntry, EntryKind};
pub use retry::{RetryConfig, RetryableError};
