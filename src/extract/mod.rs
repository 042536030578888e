//! Page image extraction from viewer markup
//!
//! A snapshot of the rendered document contains one container element per
//! page the viewer currently holds in its window. Containers fill in lazily:
//! the image element appears first without a source address and only gets one
//! once the viewer has fetched that page, so a single page can show up across
//! several consecutive snapshots in different states.

mod address;

pub use address::{page_token, with_max_width, MAX_PAGE_WIDTH};

use scraper::{Html, Selector};

/// CSS selector for the per-page container elements.
const PAGE_CONTAINER_SELECTOR: &str = "div.pageImageDisplay";

/// CSS selector for the image element inside a page container.
const PAGE_IMAGE_SELECTOR: &str = "img";

/// A page image visible in one markup snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    /// The viewer's own page token (`pg` parameter), if one could be read
    pub token: Option<String>,

    /// Source address of the image element
    pub address: String,
}

/// Extracts all currently visible page images from a markup snapshot
///
/// Containers whose image carries no source address yet are skipped; images
/// whose address carries no readable page token are returned with
/// `token: None` so the caller can still account for them. Entries come back
/// in document order, and a fresh call against a new snapshot is fully
/// independent of previous calls.
pub fn extract_entries(markup: &str) -> Vec<PageEntry> {
    let document = Html::parse_document(markup);
    let mut entries = Vec::new();

    if let (Ok(container_selector), Ok(image_selector)) = (
        Selector::parse(PAGE_CONTAINER_SELECTOR),
        Selector::parse(PAGE_IMAGE_SELECTOR),
    ) {
        for container in document.select(&container_selector) {
            for image in container.select(&image_selector) {
                if let Some(src) = image.value().attr("src") {
                    entries.push(PageEntry {
                        token: page_token(src),
                        address: src.to_string(),
                    });
                }
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_image(token: &str, width: u32) -> String {
        format!(
            r#"<div class="pageImageDisplay"><img src="https://books.google.de/books/content?id=rV1KAAAAcAAJ&amp;pg={}&amp;img=1&amp;w={}"/></div>"#,
            token, width
        )
    }

    #[test]
    fn test_extracts_visible_pages_in_order() {
        let markup = format!(
            "<html><body>{}{}</body></html>",
            page_image("PP5", 1024),
            page_image("PP6", 1024)
        );
        let entries = extract_entries(&markup);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].token, Some("PP5".to_string()));
        assert_eq!(entries[1].token, Some("PP6".to_string()));
    }

    #[test]
    fn test_skips_image_without_source() {
        let markup = r#"<html><body>
            <div class="pageImageDisplay"><img/></div>
        </body></html>"#;
        let entries = extract_entries(markup);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_ignores_unrelated_images() {
        let markup = r#"<html><body>
            <div class="toolbar"><img src="https://example.com/icon.png"/></div>
            <img src="https://example.com/logo.png"/>
        </body></html>"#;
        let entries = extract_entries(markup);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_address_without_token_is_unidentifiable() {
        let markup = r#"<html><body>
            <div class="pageImageDisplay"><img src="https://books.google.de/books/content?id=rV1KAAAAcAAJ&amp;img=1"/></div>
        </body></html>"#;
        let entries = extract_entries(markup);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].token, None);
    }

    #[test]
    fn test_empty_markup() {
        assert!(extract_entries("").is_empty());
        assert!(extract_entries("<html><body></body></html>").is_empty());
    }

    #[test]
    fn test_mixed_states_in_one_snapshot() {
        let markup = format!(
            r#"<html><body>
            {}
            <div class="pageImageDisplay"><img/></div>
            <div class="pageImageDisplay"><img src="https://books.google.de/books/content?id=rV1KAAAAcAAJ"/></div>
            </body></html>"#,
            page_image("PA1", 800)
        );
        let entries = extract_entries(&markup);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].token, Some("PA1".to_string()));
        assert_eq!(entries[1].token, None);
    }
}
