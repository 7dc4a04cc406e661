use crate::error::BrowseError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::Value;

/// Extensions served verbatim as base64 for display as images.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaClass {
    Image,
    Text,
}

impl MediaClass {
    pub fn for_extension(extension: &str) -> Self {
        if IMAGE_EXTENSIONS.contains(&extension) {
            MediaClass::Image
        } else {
            MediaClass::Text
        }
    }
}

/// A fetched file ready for display.
///
/// `content` is base64 for [`MediaClass::Image`] and decoded UTF-8 for
/// [`MediaClass::Text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileContent {
    pub content: String,
    #[serde(rename = "type")]
    pub media_class: MediaClass,
    pub extension: String,
}

/// Lowercased text after the last `.` of `path`.
///
/// A path without a dot yields the whole lowercased path, so `Makefile` has
/// the extension `makefile`.
pub fn extension_of(path: &str) -> String {
    let lower = path.to_lowercase();
    match lower.rsplit_once('.') {
        Some((_, ext)) => ext.to_string(),
        None => lower,
    }
}

/// Classify and decode a contents payload fetched for `path`.
pub fn decode_file(path: &str, payload: &Value) -> Result<FileContent, BrowseError> {
    let raw = payload
        .get("content")
        .and_then(Value::as_str)
        .ok_or(BrowseError::MissingContent)?;

    let extension = extension_of(path);
    let media_class = MediaClass::for_extension(&extension);

    let content = match media_class {
        MediaClass::Image => raw.to_string(),
        MediaClass::Text => decode_text(raw)?,
    };

    Ok(FileContent {
        content,
        media_class,
        extension,
    })
}

/// Decode base64 text as UTF-8. Line breaks inserted by the API are ignored.
pub fn decode_text(encoded: &str) -> Result<String, BrowseError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| BrowseError::InvalidEncoding(e.to_string()))?;

    String::from_utf8(bytes).map_err(|_| BrowseError::UnsupportedFormat)
}
