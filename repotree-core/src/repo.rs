use crate::error::BrowseError;
use std::fmt;

/// Marker that must appear in a repository URL, followed by `/owner/name`.
pub const HOST_MARKER: &str = "github.com";

/// Owner and name of a hosted repository. Both parts are non-empty single
/// path segments other than `.` and `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    owner: String,
    name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, BrowseError> {
        let owner = owner.into();
        let name = name.into();
        if !is_plain_segment(&owner) || !is_plain_segment(&name) {
            return Err(BrowseError::InvalidRepoUrl);
        }
        Ok(Self { owner, name })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Split a repository URL such as `https://github.com/owner/name` into a
/// [`RepoRef`].
///
/// The scheme is optional. A single trailing `/`, a query string or fragment,
/// and a `.git` suffix are tolerated; deeper paths such as `/tree/main` are
/// rejected.
pub fn parse_repo_url(repo_url: &str) -> Result<RepoRef, BrowseError> {
    let marker = format!("{}/", HOST_MARKER);
    let (_, details) = repo_url
        .trim()
        .split_once(&marker)
        .ok_or(BrowseError::InvalidRepoUrl)?;

    let details = details
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let details = details.strip_suffix('/').unwrap_or(details);

    let (owner, name) = details.split_once('/').ok_or(BrowseError::InvalidRepoUrl)?;
    if name.contains('/') {
        return Err(BrowseError::InvalidRepoUrl);
    }
    let name = name.strip_suffix(".git").unwrap_or(name);

    RepoRef::new(owner, name)
}

fn is_plain_segment(part: &str) -> bool {
    !part.is_empty() && part != "." && part != ".." && !part.contains('/')
}
