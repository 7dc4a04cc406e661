use crate::error::{Result, ScanError};
use serde::Deserialize;
use serde_json::Value;

/// Kind of an item in a directory listing.
///
/// The contents API also reports `symlink` and `submodule` entries; those are
/// neither walked nor reported as files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    #[serde(other)]
    Other,
}

/// One item of a directory listing. `path` is relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl DirectoryEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Dir,
        }
    }
}

/// Interpret a contents payload as a directory listing.
pub fn parse_listing(payload: Value) -> Result<Vec<DirectoryEntry>> {
    if !payload.is_array() {
        return Err(ScanError::MalformedResponse("list expected.".to_string()));
    }

    serde_json::from_value(payload)
        .map_err(|e| ScanError::MalformedResponse(format!("invalid entry: {}", e)))
}

/// Split a listing into file paths and subdirectory paths, preserving order.
pub fn partition(entries: Vec<DirectoryEntry>) -> (Vec<String>, Vec<String>) {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for entry in entries {
        match entry.kind {
            EntryKind::File => files.push(entry.path),
            EntryKind::Dir => dirs.push(entry.path),
            EntryKind::Other => {}
        }
    }

    (files, dirs)
}
