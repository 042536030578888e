//! Traversal engine - per-cycle harvest logic
//!
//! Each cycle takes a snapshot of the rendered document, extracts the visible
//! page images, and runs every entry through the dedup/persist/terminate
//! rules. Only when a cycle ends with the run still live does the engine
//! advance the viewport, so every newly observed page is fully persisted
//! before the renderer moves on.

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use super::downloader::Downloader;
use super::state::TraversalState;
use crate::config::HarvestConfig;
use crate::extract::{extract_entries, with_max_width, PageEntry};
use crate::output::{page_filename, RunSummary};
use crate::viewer::DocumentViewer;
use crate::Result;

/// Parameters of a single run, resolved by the caller
#[derive(Debug, Clone)]
pub struct HarvestRun {
    /// The viewer's identifier for the document
    pub document_id: String,

    /// Stop as soon as this page token is observed
    pub end_token: Option<String>,

    /// Directory page images are written into; must already exist
    pub output_dir: PathBuf,
}

/// Traversal engine: drives the viewer, dedups pages, persists new ones
///
/// Owns all run state. The viewer and downloader are borrowed so the caller
/// can keep control of their lifetimes (closing the browser, in particular).
pub struct Harvester<'a, V, D> {
    viewer: &'a V,
    downloader: &'a D,
    run: HarvestRun,
    state: TraversalState,
    advance_delay: Duration,
}

impl<'a, V: DocumentViewer, D: Downloader> Harvester<'a, V, D> {
    pub fn new(viewer: &'a V, downloader: &'a D, run: HarvestRun, options: &HarvestConfig) -> Self {
        Self {
            viewer,
            downloader,
            run,
            state: TraversalState::new(options.stall_limit),
            advance_delay: Duration::from_millis(options.advance_delay_ms),
        }
    }

    /// Runs cycles until a termination condition fires
    ///
    /// Viewer and transfer failures abort the run; partially downloaded runs
    /// leave their files on disk and are not resumable.
    pub async fn run(mut self) -> Result<RunSummary> {
        info!("Harvesting document {}", self.run.document_id);

        loop {
            let markup = self.viewer.snapshot().await?;
            let entries = extract_entries(&markup);
            self.process_entries(&entries).await?;

            if self.state.phase().is_terminating() {
                break;
            }

            // Give the renderer a moment to populate newly scrolled-in pages.
            tokio::time::sleep(self.advance_delay).await;
            self.viewer.advance().await?;
        }

        let termination = self.state.finish();
        info!("Run finished: {}", termination);

        Ok(RunSummary {
            document_id: self.run.document_id.clone(),
            pages_saved: self.state.pages_recorded(),
            entries_seen: self.state.sequence(),
            termination,
        })
    }

    /// Applies the dedup/persist/terminate rules to one snapshot's entries
    async fn process_entries(&mut self, entries: &[PageEntry]) -> Result<()> {
        for entry in entries {
            let token = match &entry.token {
                Some(token) => token,
                None => {
                    // Visible but unattributable. It still consumes a page
                    // number so the output stays aligned with the document.
                    let sequence = self.state.next_sequence();
                    info!("Skipping unidentifiable page {:04}", sequence);
                    continue;
                }
            };

            if !self.state.is_recorded(token) {
                self.persist_page(token, &entry.address).await?;
            } else if self.state.record_stall() {
                info!(
                    "Advanced {} times without finding a new page, stopping",
                    self.state.stall()
                );
                self.state.stall_out();
                break;
            }

            // The end page stops the run even when it was already recorded.
            if self.run.end_token.as_deref() == Some(token.as_str()) {
                info!("Configured end page {} observed, stopping", token);
                self.state.reach_end_page();
                break;
            }
        }

        Ok(())
    }

    /// Records a new page and downloads it at maximum width
    async fn persist_page(&mut self, token: &str, address: &str) -> Result<()> {
        let sequence = self.state.record(token, address);
        let address = with_max_width(address);
        let destination = self
            .run
            .output_dir
            .join(page_filename(&self.run.document_id, sequence, token));

        self.downloader
            .fetch_and_store(&address, &destination)
            .await?;
        info!("{:04} {} {}", sequence, token, address);

        Ok(())
    }
}
