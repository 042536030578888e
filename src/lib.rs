//! Quire-Harvest: a page image harvester for dynamic document viewers
//!
//! This crate drives a browser through a dynamically rendered, paginated
//! document viewer, watches the markup for page images as the renderer loads
//! them in, and downloads every newly observed page exactly once until the
//! end of the document is reached.

pub mod config;
pub mod extract;
pub mod harvest;
pub mod output;
pub mod viewer;

use thiserror::Error;

/// Main error type for Quire-Harvest operations
#[derive(Debug, Error)]
pub enum QuireError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Viewer error: {0}")]
    Viewer(String),

    #[error("Browser protocol error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("Timed out after {seconds}s opening {url}")]
    NavigationTimeout { url: String, seconds: u64 },

    #[error("Image transfer failed for {address}: {source}")]
    Transfer {
        address: String,
        source: reqwest::Error,
    },

    #[error("Image transfer for {address} returned HTTP {status}")]
    TransferStatus { address: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Quire-Harvest operations
pub type Result<T> = std::result::Result<T, QuireError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{extract_entries, PageEntry};
pub use harvest::{Harvester, Phase, Termination, TraversalState};
pub use output::RunSummary;
