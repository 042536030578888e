//! Traversal engine module
//!
//! This module owns everything stateful about a run: the dedup ledger and
//! counters, the cycle loop that drives the viewer, and the downloader seam
//! used to persist newly observed pages.

mod downloader;
mod engine;
mod state;

pub use downloader::{Downloader, HttpDownloader};
pub use engine::{HarvestRun, Harvester};
pub use state::{Phase, Termination, TraversalState};
