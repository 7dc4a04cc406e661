use crate::error::{DetailError, EnvelopeError};
use crate::server::AppState;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use repotree_core::{BrowseError, FileContent};
use serde::{Deserialize, Serialize};

pub const GREETING: &str = "Hello, welcome to repotree! Try /repo-files/?repo_url=...";

#[derive(Debug, Deserialize)]
pub struct RepoFilesQuery {
    pub repo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FileContentQuery {
    pub repo_url: Option<String>,
    pub file_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FileContentData {
    #[serde(flatten)]
    pub file: FileContent,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessEnvelope<T> {
    pub success: bool,
    pub data: T,
}

pub async fn root() -> Json<&'static str> {
    Json(GREETING)
}

/// Malformed query strings are reported in the endpoint's own error shape.
fn query_or_invalid<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, BrowseError> {
    query
        .map(|Query(q)| q)
        .map_err(|rejection| BrowseError::InvalidInput(rejection.body_text()))
}

/// `GET /repo-files/?repo_url=` - every file path in the repository.
pub async fn repo_files(
    State(state): State<AppState>,
    query: Result<Query<RepoFilesQuery>, QueryRejection>,
) -> Result<Json<Vec<String>>, DetailError> {
    let repo_url = query_or_invalid(query)?
        .repo_url
        .ok_or(BrowseError::MissingParameter("repo_url"))?;

    let names = state.browser.list_repo_files(&repo_url).await?;
    Ok(Json(names))
}

/// `GET /file-content/?repo_url=&file_path=` - one file, decoded for display.
pub async fn file_content(
    State(state): State<AppState>,
    query: Result<Query<FileContentQuery>, QueryRejection>,
) -> Result<Json<SuccessEnvelope<FileContentData>>, EnvelopeError> {
    let query = query_or_invalid(query)?;
    let repo_url = query
        .repo_url
        .ok_or(BrowseError::MissingParameter("repo_url"))?;
    let file_path = query
        .file_path
        .ok_or(BrowseError::MissingParameter("file_path"))?;

    let file = state
        .browser
        .fetch_file_content(&repo_url, &file_path)
        .await?;

    Ok(Json(SuccessEnvelope {
        success: true,
        data: FileContentData {
            file,
            filename: file_path,
        },
    }))
}
