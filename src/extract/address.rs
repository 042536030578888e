//! Image address fields
//!
//! Page image addresses are plain URLs whose query string carries the two
//! fields the harvester cares about: `pg`, the viewer's own page token, and
//! `w`, the requested render width in pixels. Both are read and rewritten as
//! named query parameters rather than by substring matching, so a reordered
//! query string keeps working.

use url::Url;

/// Widest rendition the viewer will serve.
pub const MAX_PAGE_WIDTH: u32 = 2500;

/// Query key carrying the page token.
const PAGE_KEY: &str = "pg";

/// Query key carrying the requested render width.
const WIDTH_KEY: &str = "w";

/// Reads the page token out of an image address
///
/// Returns `None` for an unparseable address or one without a `pg`
/// parameter; such an image is visible but cannot be attributed to a page.
pub fn page_token(address: &str) -> Option<String> {
    let url = Url::parse(address).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == PAGE_KEY)
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}

/// Rewrites the width parameter of an image address to the maximum rendition
///
/// Only an existing `w` parameter is rewritten; an address without one, or
/// one that does not parse as a URL, is returned unchanged. Applying this to
/// an already rewritten address yields the same address.
pub fn with_max_width(address: &str) -> String {
    let mut url = match Url::parse(address) {
        Ok(url) => url,
        Err(_) => return address.to_string(),
    };

    let query = match url.query() {
        Some(query) => query.to_string(),
        None => return address.to_string(),
    };

    if !query
        .split('&')
        .any(|pair| pair.split('=').next() == Some(WIDTH_KEY))
    {
        return address.to_string();
    }

    let rewritten: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((WIDTH_KEY, _)) => format!("{}={}", WIDTH_KEY, MAX_PAGE_WIDTH),
            _ => pair.to_string(),
        })
        .collect();

    url.set_query(Some(&rewritten.join("&")));
    url.to_string()
}
