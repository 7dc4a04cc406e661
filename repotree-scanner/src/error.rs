use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    /// The upstream API answered 404 for the requested path.
    #[error("not found")]
    NotFound,

    /// Any other non-success upstream status.
    #[error("{context}: {status}.")]
    Upstream { status: u16, context: String },

    #[error("Invalid response format from GitHub API - {0}")]
    MalformedResponse(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A repository or file path that cannot be addressed as plain segments.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

impl ScanError {
    pub fn upstream(status: u16, context: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            context: context.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
