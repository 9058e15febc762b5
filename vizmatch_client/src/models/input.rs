use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};
use vizmatch::SearchRequest;

use crate::models::client::SearchError;

/// Turn a selected file into an inline search payload. The declared media
/// type must be an image; the bytes are embedded as a self-describing data
/// URL so the preview needs no second fetch. No network I/O happens here.
pub fn normalize_file(media_type: &str, bytes: &[u8]) -> Result<SearchRequest, SearchError> {
    if !media_type.starts_with("image/") {
        return Err(SearchError::InvalidFileType);
    }
    if bytes.is_empty() {
        return Err(SearchError::EmptyInput);
    }
    let payload = STANDARD.encode(bytes);
    Ok(SearchRequest::Inline(format!(
        "data:{media_type};base64,{payload}"
    )))
}

/// Turn a free-text URL into a search payload. Only emptiness is validated;
/// reachability failures surface later from the gateway or the upstream.
pub fn normalize_url(raw: &str) -> Result<SearchRequest, SearchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SearchError::EmptyInput);
    }
    Ok(SearchRequest::Url(trimmed.to_string()))
}

/// Stand-in for the media type a browser would declare for a selected file.
/// Unknown extensions mean "not an image".
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "bmp" => Some("image/bmp"),
        "gif" => Some("image/gif"),
        "jpeg" | "jpg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
