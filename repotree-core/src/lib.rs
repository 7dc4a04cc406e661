pub mod browse;
pub mod content;
pub mod error;
pub mod repo;

pub use browse::RepoBrowser;
pub use content::{FileContent, MediaClass};
pub use error::BrowseError;
pub use repo::{RepoRef, parse_repo_url};
