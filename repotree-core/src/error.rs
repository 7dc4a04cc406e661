use repotree_scanner::ScanError;
use thiserror::Error;

/// Every failure a browse operation can surface to a caller.
#[derive(Error, Debug)]
pub enum BrowseError {
    #[error("invalid github repo url.")]
    InvalidRepoUrl,

    #[error("missing query parameter: {0}")]
    MissingParameter(&'static str),

    #[error("{0}")]
    InvalidInput(String),

    #[error("not found")]
    NotFound,

    #[error("{context}: {status}.")]
    Upstream { status: u16, context: String },

    #[error("Invalid response format from GitHub API - {0}")]
    MalformedUpstreamResponse(String),

    #[error("No content found")]
    MissingContent,

    #[error("File format is not supported for viewing")]
    UnsupportedFormat,

    #[error("invalid base64 content: {0}")]
    InvalidEncoding(String),

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("{0}")]
    Internal(String),
}

impl BrowseError {
    /// HTTP status this failure is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            BrowseError::InvalidRepoUrl
            | BrowseError::MissingParameter(_)
            | BrowseError::InvalidInput(_)
            | BrowseError::MalformedUpstreamResponse(_)
            | BrowseError::MissingContent
            | BrowseError::UnsupportedFormat => 400,
            BrowseError::NotFound => 404,
            BrowseError::Upstream { status, .. } => *status,
            BrowseError::Transport(_) => 502,
            BrowseError::InvalidEncoding(_) | BrowseError::Internal(_) => 500,
        }
    }
}

impl From<ScanError> for BrowseError {
    fn from(e: ScanError) -> Self {
        match e {
            ScanError::NotFound => BrowseError::NotFound,
            ScanError::Upstream { status, context } => BrowseError::Upstream { status, context },
            ScanError::MalformedResponse(msg) => BrowseError::MalformedUpstreamResponse(msg),
            ScanError::Transport(e) => BrowseError::Transport(e.to_string()),
            ScanError::InvalidUrl(msg) => BrowseError::Internal(msg),
            ScanError::InvalidPath(msg) => BrowseError::InvalidInput(msg),
        }
    }
}
