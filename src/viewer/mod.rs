//! Document viewer handles
//!
//! The traversal engine needs three things from a viewer: the document opened
//! at a starting page, a snapshot of the rendered markup, and a way to push
//! the viewport further into the document. [`DocumentViewer`] captures that
//! contract so the engine never names a browser; the Chrome implementation
//! lives in [`chrome`].

mod chrome;

pub use chrome::ChromeViewer;

use async_trait::async_trait;

use crate::config::ViewerConfig;
use crate::Result;

/// URL fragment pinning the viewer to single-page layout.
const VIEW_FLAGS: &str = "#v=onepage&q&f=false";

/// A live, navigable rendered-document handle
#[async_trait]
pub trait DocumentViewer {
    /// Returns the markup of the document as currently rendered
    ///
    /// Must reflect the renderer's state at call time; the extractor works on
    /// whatever this returns.
    async fn snapshot(&self) -> Result<String>;

    /// Moves the viewport one step further into the document
    async fn advance(&self) -> Result<()>;
}

/// Composes the fully qualified starting URL for a document
///
/// The identifier is appended directly to the configured base URL; the start
/// token and locale ride along as query parameters ahead of the view flags.
pub fn build_viewer_url(config: &ViewerConfig, document_id: &str, start_token: &str) -> String {
    format!(
        "{}{}&pg={}&hl={}{}",
        config.base_url, document_id, start_token, config.locale, VIEW_FLAGS
    )
}
