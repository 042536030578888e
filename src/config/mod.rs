//! Configuration module for Quire-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every field has a default, so a config file is optional; per-run
//! parameters (document id, start/end page) come from the command line.
//!
//! # Example
//!
//! ```no_run
//! use quire_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Pages will be written to: {}", config.output.directory);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HarvestConfig, OutputConfig, ViewerConfig};

// Re-export parser functions
pub use parser::load_config;
