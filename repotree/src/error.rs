//! HTTP renderings of [`BrowseError`].
//!
//! The file listing endpoint reports failures as `{"detail": ...}`; the file
//! content endpoint wraps them in `{"success": false, "error": ...}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use repotree_core::BrowseError;
use serde::Serialize;
use tracing::{error, warn};

fn status_for(err: &BrowseError) -> StatusCode {
    StatusCode::from_u16(err.status_code())
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn log_failure(status: StatusCode, err: &BrowseError) {
    if status.is_server_error() {
        error!(status = status.as_u16(), "request failed: {}", err);
    } else {
        warn!(status = status.as_u16(), "request rejected: {}", err);
    }
}

#[derive(Debug, Serialize)]
pub struct DetailBody {
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct FailureEnvelope {
    pub success: bool,
    pub error: String,
}

#[derive(Debug)]
pub struct DetailError(pub BrowseError);

impl From<BrowseError> for DetailError {
    fn from(e: BrowseError) -> Self {
        Self(e)
    }
}

impl IntoResponse for DetailError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        log_failure(status, &self.0);
        let body = DetailBody {
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug)]
pub struct EnvelopeError(pub BrowseError);

impl From<BrowseError> for EnvelopeError {
    fn from(e: BrowseError) -> Self {
        Self(e)
    }
}

impl IntoResponse for EnvelopeError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        log_failure(status, &self.0);
        let body = FailureEnvelope {
            success: false,
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
