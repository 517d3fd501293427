use reqwest::Url;

use crate::error::AdminApiError;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Join a resource path (and optional id) onto the base URL.
///
/// Joining rules:
/// 1) absolute `http(s)://` paths are used as-is
/// 2) slashes between base and path collapse to one
/// 3) `id` is appended as its own percent-encoded segment
/// 4) query pairs are appended in order; no `?` is emitted when empty
pub fn endpoint_url(
    base: &str,
    path: &str,
    id: Option<&str>,
    query: &[(String, String)],
) -> Result<Url, AdminApiError> {
    let path = path.trim();
    let raw = if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        let base = if base.trim().is_empty() {
            DEFAULT_BASE_URL
        } else {
            base.trim()
        };
        let base = base.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    };

    let mut url = Url::parse(&raw).map_err(|error| AdminApiError::InvalidUrl(format!("{raw}: {error}")))?;

    if let Some(id) = id {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| AdminApiError::InvalidUrl(format!("{raw}: cannot append id segment")))?;
        segments.pop_if_empty().push(id);
    }

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}
