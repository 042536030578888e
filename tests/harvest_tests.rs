//! Integration tests for the traversal engine
//!
//! These drive whole runs with a scripted fake viewer and a recording fake
//! downloader, so termination behavior can be exercised without a browser or
//! network.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use quire_harvest::config::HarvestConfig;
use quire_harvest::harvest::{Downloader, HarvestRun, Harvester, Termination};
use quire_harvest::viewer::DocumentViewer;
use quire_harvest::{QuireError, Result};

/// Viewer that replays a fixed list of snapshots, repeating the last one
struct ScriptedViewer {
    snapshots: Vec<String>,
    cursor: AtomicUsize,
    advances: AtomicUsize,
}

impl ScriptedViewer {
    fn new(snapshots: Vec<String>) -> Self {
        assert!(!snapshots.is_empty());
        Self {
            snapshots,
            cursor: AtomicUsize::new(0),
            advances: AtomicUsize::new(0),
        }
    }

    fn advances(&self) -> usize {
        self.advances.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentViewer for ScriptedViewer {
    async fn snapshot(&self) -> Result<String> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        let index = index.min(self.snapshots.len() - 1);
        Ok(self.snapshots[index].clone())
    }

    async fn advance(&self) -> Result<()> {
        self.advances.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Downloader that records requested transfers instead of performing them
#[derive(Default)]
struct RecordingDownloader {
    calls: Mutex<Vec<(String, PathBuf)>>,
}

impl RecordingDownloader {
    fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Downloader for RecordingDownloader {
    async fn fetch_and_store(&self, address: &str, destination: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((address.to_string(), destination.to_path_buf()));
        Ok(())
    }
}

/// Downloader that fails every transfer
#[derive(Default)]
struct FailingDownloader {
    attempts: AtomicUsize,
}

#[async_trait]
impl Downloader for FailingDownloader {
    async fn fetch_and_store(&self, address: &str, _destination: &Path) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(QuireError::TransferStatus {
            address: address.to_string(),
            status: 500,
        })
    }
}

fn entry_with_token(token: &str, width: u32) -> String {
    format!(
        r#"<div class="pageImageDisplay"><img src="https://viewer.example/content?id=DOC1&amp;pg={}&amp;img=1&amp;zoom=3&amp;w={}"/></div>"#,
        token, width
    )
}

fn entry_without_token() -> String {
    r#"<div class="pageImageDisplay"><img src="https://viewer.example/content?id=DOC1&amp;img=1"/></div>"#
        .to_string()
}

fn snapshot(entries: &[String]) -> String {
    format!("<html><body>{}</body></html>", entries.concat())
}

fn test_options() -> HarvestConfig {
    HarvestConfig {
        stall_limit: 20,
        advance_delay_ms: 10,
        download_timeout_secs: 5,
    }
}

fn test_run(end_token: Option<&str>) -> HarvestRun {
    HarvestRun {
        document_id: "DOC1".to_string(),
        end_token: end_token.map(str::to_string),
        output_dir: PathBuf::from("/tmp/quire-harvest-test"),
    }
}

#[tokio::test]
async fn test_repeated_page_downloads_once_then_stalls() {
    let viewer = ScriptedViewer::new(vec![snapshot(&[entry_with_token("PP7", 1024)])]);
    let downloader = RecordingDownloader::default();

    let harvester = Harvester::new(&viewer, &downloader, test_run(None), &test_options());
    let summary = harvester.run().await.expect("run failed");

    // Exactly one persist despite the page being visible every cycle
    let calls = downloader.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.contains("w=2500"));
    assert!(!calls[0].0.contains("w=1024"));
    assert_eq!(
        calls[0].1.file_name().unwrap().to_str().unwrap(),
        "DOC1,0001,PP7.jpeg"
    );

    assert_eq!(summary.pages_saved, 1);
    assert_eq!(summary.termination, Termination::Stalled);

    // One advance after the persist cycle, then one per tolerated stall;
    // crossing the limit stops the run without a further advance.
    assert_eq!(viewer.advances(), 21);
}

#[tokio::test]
async fn test_end_page_fires_even_on_a_fresh_page() {
    let viewer = ScriptedViewer::new(vec![
        snapshot(&[entry_with_token("PP1", 1024)]),
        snapshot(&[entry_with_token("PP1", 1024), entry_with_token("PR1", 1024)]),
    ]);
    let downloader = RecordingDownloader::default();

    let harvester = Harvester::new(&viewer, &downloader, test_run(Some("PR1")), &test_options());
    let summary = harvester.run().await.expect("run failed");

    // The end page is persisted before the run stops
    let calls = downloader.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1].1.file_name().unwrap().to_str().unwrap(),
        "DOC1,0002,PR1.jpeg"
    );

    assert_eq!(summary.termination, Termination::EndPageReached);

    // No advance after the cycle that saw the end page
    assert_eq!(viewer.advances(), 1);
}

#[tokio::test]
async fn test_end_page_on_the_first_cycle() {
    let viewer = ScriptedViewer::new(vec![snapshot(&[entry_with_token("PP1", 1024)])]);
    let downloader = RecordingDownloader::default();

    let harvester = Harvester::new(&viewer, &downloader, test_run(Some("PP1")), &test_options());
    let summary = harvester.run().await.expect("run failed");

    assert_eq!(downloader.calls().len(), 1);
    assert_eq!(summary.termination, Termination::EndPageReached);
    assert_eq!(viewer.advances(), 0);
}

#[tokio::test]
async fn test_unidentifiable_entries_consume_sequence_numbers() {
    let viewer = ScriptedViewer::new(vec![snapshot(&[
        entry_without_token(),
        entry_with_token("PP5", 1024),
    ])]);
    let downloader = RecordingDownloader::default();

    let harvester = Harvester::new(&viewer, &downloader, test_run(None), &test_options());
    let summary = harvester.run().await.expect("run failed");

    // The placeholder took sequence number 1, so the real page gets 2
    let calls = downloader.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].1.file_name().unwrap().to_str().unwrap(),
        "DOC1,0002,PP5.jpeg"
    );

    // The placeholder consumed one number per cycle: 22 cycles until the
    // stall limit was crossed, plus the single real page.
    assert_eq!(summary.pages_saved, 1);
    assert_eq!(summary.entries_seen, 23);
    assert_eq!(summary.unidentified(), 22);
    assert_eq!(summary.termination, Termination::Stalled);
}

#[tokio::test]
async fn test_sequence_numbers_are_contiguous_and_ordered() {
    let viewer = ScriptedViewer::new(vec![
        snapshot(&[entry_with_token("PP1", 1024)]),
        snapshot(&[entry_with_token("PP2", 1024), entry_with_token("PP3", 1024)]),
    ]);
    let downloader = RecordingDownloader::default();

    let harvester = Harvester::new(&viewer, &downloader, test_run(None), &test_options());
    let summary = harvester.run().await.expect("run failed");

    let names: Vec<String> = downloader
        .calls()
        .iter()
        .map(|(_, path)| path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "DOC1,0001,PP1.jpeg",
            "DOC1,0002,PP2.jpeg",
            "DOC1,0003,PP3.jpeg",
        ]
    );

    assert_eq!(summary.pages_saved, 3);
    assert_eq!(summary.entries_seen, 3);
}

#[tokio::test]
async fn test_lower_stall_limit_is_honored() {
    let viewer = ScriptedViewer::new(vec![snapshot(&[entry_with_token("PP1", 1024)])]);
    let downloader = RecordingDownloader::default();
    let options = HarvestConfig {
        stall_limit: 3,
        ..test_options()
    };

    let harvester = Harvester::new(&viewer, &downloader, test_run(None), &options);
    let summary = harvester.run().await.expect("run failed");

    assert_eq!(summary.termination, Termination::Stalled);
    assert_eq!(viewer.advances(), 4);
}

#[tokio::test]
async fn test_transfer_failure_aborts_the_run() {
    let viewer = ScriptedViewer::new(vec![snapshot(&[entry_with_token("PP1", 1024)])]);
    let downloader = FailingDownloader::default();

    let harvester = Harvester::new(&viewer, &downloader, test_run(None), &test_options());
    let result = harvester.run().await;

    assert!(result.is_err());
    assert!(matches!(
        result.unwrap_err(),
        QuireError::TransferStatus { status: 500, .. }
    ));

    // No retry, and the failed cycle never advanced the viewer
    assert_eq!(downloader.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(viewer.advances(), 0);
}
